use crate::models::OptionsResponse;

pub fn render_index(title: &str, options: &OptionsResponse) -> String {
    INDEX_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{YEAR_OPTIONS}}", &option_tags(&options.years))
        .replace("{{MONTH_OPTIONS}}", &option_tags(&options.months))
}

fn option_tags(values: &[String]) -> String {
    values
        .iter()
        .map(|value| {
            let value = escape_html(value);
            format!(r#"<option value="{value}">{value}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n          ")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg: #f6f4fb;
      --ink: #2c3e50;
      --accent: #ff0053;
      --accent-2: #8e2de2;
      --card: #ffffff;
      --shadow: 0 4px 20px rgba(0, 0, 0, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", Arial, sans-serif;
      padding: 24px 18px 48px;
    }

    h1 {
      text-align: center;
      color: white;
      font-size: clamp(1.8rem, 4vw, 3rem);
      padding: 20px;
      margin: 0 0 30px;
      border-radius: 12px;
      background: linear-gradient(135deg, #ffdb00, #ff0053);
      box-shadow: var(--shadow);
    }

    .filters {
      display: flex;
      flex-wrap: wrap;
      gap: 24px;
      justify-content: center;
    }

    .filters label {
      display: grid;
      gap: 6px;
      font-weight: bold;
    }

    select {
      width: 300px;
      max-width: 100%;
      padding: 8px 10px;
      border-radius: 8px;
      border: 1px solid rgba(44, 62, 80, 0.25);
      font-size: 1rem;
    }

    #kpi {
      font-size: clamp(1.4rem, 3.5vw, 2.6rem);
      font-weight: bold;
      color: white;
      background: linear-gradient(135deg, var(--accent-2), #ff6b6b);
      padding: 25px;
      border-radius: 15px;
      text-align: center;
      box-shadow: var(--shadow);
      margin: 25px auto;
      width: min(900px, 100%);
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
      gap: 20px;
    }

    .chart-card {
      background: var(--card);
      border-radius: 16px;
      padding: 16px;
      box-shadow: var(--shadow);
    }

    .chart-card.wide {
      grid-column: 1 / -1;
    }

    .chart-card h2 {
      margin: 0 0 12px;
      font-size: 1.15rem;
    }

    svg {
      width: 100%;
      display: block;
    }

    svg text {
      font-family: Arial, sans-serif;
    }

    .chart-grid {
      stroke: lightgrey;
    }

    .chart-label {
      fill: #6b645d;
      font-size: 11px;
    }

    .chart-value {
      fill: var(--ink);
      font-size: 11px;
      font-weight: bold;
    }

    .chart-note {
      margin: -6px 0 10px;
      color: #6b645d;
      font-size: 0.9rem;
    }

    .status {
      text-align: center;
      min-height: 1.2em;
      color: #c63b2b;
    }
  </style>
</head>
<body>
  <h1>{{TITLE}}</h1>

  <section class="filters">
    <label>Select Year:
      <select id="year-filter">
          {{YEAR_OPTIONS}}
      </select>
    </label>
    <label>Select Month:
      <select id="month-filter">
          {{MONTH_OPTIONS}}
      </select>
    </label>
  </section>

  <div id="kpi">Loading...</div>
  <div class="status" id="status"></div>

  <main class="grid" id="charts"></main>

  <script>
    const PALETTE = ['#b92959', '#3969ac', '#f2b701', '#11a579', '#e68310', '#7f3c8d', '#008695', '#cf1c90', '#80ba5a', '#4b4b8f'];
    const MONTHS = ['Jan', 'Feb', 'Mar', 'Apr', 'May', 'Jun', 'Jul', 'Aug', 'Sep', 'Oct', 'Nov', 'Dec'];
    const CHART_ORDER = ['month_trend', 'sales_person', 'order_status', 'order_set', 'order_country', 'district', 'category', 'sub_category'];

    const yearEl = document.getElementById('year-filter');
    const monthEl = document.getElementById('month-filter');
    const kpiEl = document.getElementById('kpi');
    const statusEl = document.getElementById('status');
    const chartsEl = document.getElementById('charts');

    const escapeText = (value) => String(value)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;');

    const formatQty = (value) => {
      const rounded = Math.round(value * 100) / 100;
      return Number.isInteger(rounded) ? rounded.toString() : rounded.toFixed(2);
    };

    const emptyChart = () =>
      '<svg viewBox="0 0 600 120"><text class="chart-label" x="300" y="60" text-anchor="middle">No data</text></svg>';

    const renderLine = (points) => {
      if (!points.length) {
        return emptyChart();
      }
      const width = 900;
      const height = 360;
      const padX = 50;
      const padY = 40;
      const top = 30;
      const max = Math.max(...points.map((p) => p.qty), 1);
      const xStep = (width - padX * 2) / (MONTHS.length - 1);
      const x = (monthNum) => padX + (monthNum - 1) * xStep;
      const y = (value) => height - padY - (value / max) * (height - top - padY);

      const series = new Map();
      points.forEach((p) => {
        if (!series.has(p.year)) {
          series.set(p.year, []);
        }
        series.get(p.year).push(p);
      });

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = (max * i) / 4;
        grid += `<line class="chart-grid" x1="${padX}" y1="${y(value)}" x2="${width - padX}" y2="${y(value)}" />`;
        grid += `<text class="chart-label" x="${padX - 8}" y="${y(value) + 4}" text-anchor="end">${formatQty(value)}</text>`;
      }
      const xLabels = MONTHS
        .map((m, i) => `<text class="chart-label" x="${x(i + 1)}" y="${height - padY + 18}" text-anchor="middle">${m}</text>`)
        .join('');

      let lines = '';
      let legend = '';
      Array.from(series.entries()).forEach(([year, yearPoints], index) => {
        const color = PALETTE[index % PALETTE.length];
        const path = yearPoints
          .map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(p.month_num).toFixed(2)} ${y(p.qty).toFixed(2)}`)
          .join(' ');
        lines += `<path d="${path}" fill="none" stroke="${color}" stroke-width="3" />`;
        lines += yearPoints
          .map((p) => `<circle cx="${x(p.month_num)}" cy="${y(p.qty)}" r="4" fill="white" stroke="${color}" stroke-width="2"><title>${p.month} ${year}: ${formatQty(p.qty)}</title></circle>`)
          .join('');
        legend += `<rect x="${padX + index * 80}" y="6" width="12" height="12" fill="${color}" />`;
        legend += `<text class="chart-label" x="${padX + index * 80 + 18}" y="16">${year}</text>`;
      });

      return `<svg viewBox="0 0 ${width} ${height}">${grid}${xLabels}${lines}${legend}</svg>`;
    };

    const renderBar = (points) => {
      if (!points.length) {
        return emptyChart();
      }
      const width = 600;
      const height = 320;
      const padX = 40;
      const padY = 60;
      const top = 20;
      const max = Math.max(...points.map((p) => p.qty), 1);
      const slot = (width - padX * 2) / points.length;
      const barWidth = Math.max(slot * 0.7, 2);
      const y = (value) => height - padY - (value / max) * (height - top - padY);

      const bars = points
        .map((p, i) => {
          const x = padX + i * slot + (slot - barWidth) / 2;
          const color = PALETTE[i % PALETTE.length];
          const label = escapeText(p.label);
          return `<rect x="${x}" y="${y(p.qty)}" width="${barWidth}" height="${height - padY - y(p.qty)}" fill="${color}"><title>${label}: ${formatQty(p.qty)}</title></rect>`
            + `<text class="chart-value" x="${x + barWidth / 2}" y="${y(p.qty) - 4}" text-anchor="middle">${formatQty(p.qty)}</text>`
            + `<text class="chart-label" x="${x + barWidth / 2}" y="${height - padY + 14}" text-anchor="end" transform="rotate(-35 ${x + barWidth / 2} ${height - padY + 14})">${label}</text>`;
        })
        .join('');
      const axis = `<line class="chart-grid" x1="${padX}" y1="${height - padY}" x2="${width - padX}" y2="${height - padY}" />`;
      return `<svg viewBox="0 0 ${width} ${height}">${axis}${bars}</svg>`;
    };

    const renderPie = (points) => {
      const total = points.reduce((acc, p) => acc + p.qty, 0);
      if (!points.length || total <= 0) {
        return emptyChart();
      }
      const cx = 160;
      const cy = 160;
      const r = 140;
      let angle = -Math.PI / 2;
      let slices = '';
      let legend = '';
      points.forEach((p, i) => {
        const color = PALETTE[i % PALETTE.length];
        const label = escapeText(p.label);
        const share = p.qty / total;
        const pct = (share * 100).toFixed(1);
        if (share >= 1) {
          slices += `<circle cx="${cx}" cy="${cy}" r="${r}" fill="${color}"><title>${label}: ${pct}%</title></circle>`;
        } else if (share > 0) {
          const end = angle + share * Math.PI * 2;
          const large = share > 0.5 ? 1 : 0;
          const x1 = cx + r * Math.cos(angle);
          const y1 = cy + r * Math.sin(angle);
          const x2 = cx + r * Math.cos(end);
          const y2 = cy + r * Math.sin(end);
          slices += `<path d="M ${cx} ${cy} L ${x1} ${y1} A ${r} ${r} 0 ${large} 1 ${x2} ${y2} Z" fill="${color}" stroke="white"><title>${label}: ${pct}%</title></path>`;
          angle = end;
        }
        legend += `<rect x="340" y="${20 + i * 22}" width="12" height="12" fill="${color}" />`;
        legend += `<text class="chart-label" x="358" y="${30 + i * 22}">${label} (${pct}%)</text>`;
      });
      return `<svg viewBox="0 0 600 ${Math.max(320, 40 + points.length * 22)}">${slices}${legend}</svg>`;
    };

    const renderChart = (chart) => {
      if (chart.kind === 'line') {
        return renderLine(chart.points);
      }
      if (chart.kind === 'pie') {
        return renderPie(chart.points);
      }
      return renderBar(chart.points);
    };

    const render = (bundle) => {
      kpiEl.textContent = bundle.kpi.text;
      chartsEl.innerHTML = CHART_ORDER
        .map((key) => {
          const chart = bundle[key];
          const wide = chart.kind === 'line' ? ' wide' : '';
          const note = chart.scope_note ? `<p class="chart-note">${escapeText(chart.scope_note)}</p>` : '';
          return `<section class="chart-card${wide}" id="${chart.id}"><h2>${escapeText(chart.title)}</h2>${note}${renderChart(chart)}</section>`;
        })
        .join('');
    };

    const refresh = async () => {
      const params = new URLSearchParams({ year: yearEl.value, month: monthEl.value });
      const res = await fetch(`/api/dashboard?${params}`);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Unable to load dashboard');
      }
      statusEl.textContent = '';
      render(await res.json());
    };

    const onChange = () => refresh().catch((err) => { statusEl.textContent = err.message; });
    yearEl.addEventListener('change', onChange);
    monthEl.addEventListener('change', onChange);
    onChange();
  </script>
</body>
</html>
"#;
