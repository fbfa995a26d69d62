use crate::models::{DashboardSnapshot, MonthBlock};
use serde_json::Value;
use std::fmt::Write;

const WEEKDAYS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

pub fn render_index(snapshot: &DashboardSnapshot, months: &[MonthBlock]) -> String {
    let today_status = snapshot
        .today_status
        .as_ref()
        .and_then(|status| status.status)
        .map(|status| status.as_str())
        .unwrap_or("unknown");

    INDEX_HTML
        .replace("{{TODAY}}", &snapshot.today)
        .replace("{{TODAY_STATUS}}", today_status)
        .replace("{{RATE}}", &snapshot.summary.attendance_rate.to_string())
        .replace("{{HOURS}}", &format!("{:.2}", snapshot.summary.total_hours))
        .replace("{{STREAK}}", &snapshot.streaks.current_streak.to_string())
        .replace("{{LONGEST}}", &snapshot.streaks.longest_streak.to_string())
        .replace("{{CORRELATION}}", &format!("{:.2}", snapshot.correlation.coefficient))
        .replace("{{INSIGHT}}", &escape(&snapshot.correlation.message))
        .replace("{{PREDICTION}}", &prediction_line(&snapshot.predictions))
        .replace("{{RECOMMENDATIONS}}", &recommendations(snapshot.insights.as_ref()))
        .replace("{{MONTHS}}", &render_months(months))
}

fn prediction_line(predictions: &Value) -> String {
    let tomorrow = &predictions["tomorrow_prediction"];
    match tomorrow["probability"].as_f64() {
        Some(probability) => format!(
            "{probability:.1}% chance of attendance tomorrow ({} confidence)",
            escape(tomorrow["confidence"].as_str().unwrap_or("N/A"))
        ),
        None => "N/A".to_string(),
    }
}

fn recommendations(insights: Option<&Value>) -> String {
    let Some(items) = insights.and_then(|value| value["recommended_improvements"].as_array()) else {
        return "<li>No insights available.</li>".to_string();
    };
    let mut html = String::new();
    for item in items.iter().filter_map(Value::as_str) {
        let _ = write!(html, "<li>{}</li>", escape(item));
    }
    html
}

fn render_months(months: &[MonthBlock]) -> String {
    let mut html = String::new();
    for block in months {
        let selected = if block.selected { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<div class="month{selected}" data-year="{}" data-month="{}"><h3>{}</h3><div class="grid">"#,
            block.year, block.month, block.name
        );
        for label in WEEKDAYS {
            let _ = write!(html, r#"<span class="weekday">{label}</span>"#);
        }
        for week in &block.weeks {
            for cell in week {
                match cell {
                    Some(cell) => {
                        let _ = write!(
                            html,
                            r#"<span class="day {}" title="{}: {} ({:.1}h)">{}</span>"#,
                            cell.tier.css_class(),
                            cell.date,
                            cell.status.as_str(),
                            cell.hours_worked,
                            cell.day
                        );
                    }
                    None => html.push_str(r#"<span class="day empty"></span>"#),
                }
            }
        }
        html.push_str("</div></div>");
    }
    html
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Attendance Dashboard</title>
  <style>
    :root {
      --bg: #f4f6f8;
      --ink: #23303a;
      --card: #ffffff;
      --accent: #2f6f9f;
      --full: #1e8e4f;
      --partial: #6cc08b;
      --low: #c5e8b7;
      --half: #f2c14e;
      --weekend: #dfe3e8;
      --absent: #e5736a;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 28px 18px 48px;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
    }

    .stat {
      background: var(--card);
      border-radius: 14px;
      padding: 16px;
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #7b8792;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent);
    }

    .actions {
      display: flex;
      gap: 12px;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    .months {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
      gap: 16px;
    }

    .month {
      background: var(--card);
      border-radius: 14px;
      padding: 12px;
      cursor: pointer;
      border: 2px solid transparent;
    }

    .month.selected {
      border-color: var(--accent);
    }

    .month h3 {
      margin: 0 0 8px;
      font-size: 1rem;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 3px;
    }

    .weekday {
      font-size: 0.7rem;
      text-align: center;
      color: #7b8792;
    }

    .day {
      font-size: 0.7rem;
      text-align: center;
      border-radius: 4px;
      padding: 3px 0;
    }

    .day.empty { background: transparent; }
    .day.present-full { background: var(--full); color: white; }
    .day.present-partial { background: var(--partial); }
    .day.present-low { background: var(--low); }
    .day.half-day { background: var(--half); }
    .day.weekend { background: var(--weekend); }
    .day.absent { background: var(--absent); color: white; }

    .status {
      min-height: 1.2em;
      color: #5d6a75;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Attendance</h1>
      <p>Today {{TODAY}}: <strong>{{TODAY_STATUS}}</strong></p>
    </header>

    <section class="panel">
      <div class="stat"><span class="label">Attendance rate</span><span class="value">{{RATE}}%</span></div>
      <div class="stat"><span class="label">Total hours</span><span class="value">{{HOURS}}</span></div>
      <div class="stat"><span class="label">Current streak</span><span class="value">{{STREAK}}</span></div>
      <div class="stat"><span class="label">Longest streak</span><span class="value">{{LONGEST}}</span></div>
      <div class="stat"><span class="label">Hours vs productivity</span><span class="value">{{CORRELATION}}</span></div>
    </section>

    <p>{{INSIGHT}}</p>
    <p>{{PREDICTION}}</p>
    <ul>{{RECOMMENDATIONS}}</ul>

    <section class="actions">
      <button data-action="login" type="button">Log in</button>
      <button data-action="logout" type="button">Log out</button>
    </section>

    <section class="panel" id="month-stats">
      <div class="stat"><span class="label">Present days</span><span id="month-present" class="value">-</span></div>
      <div class="stat"><span class="label">Month rate</span><span id="month-rate" class="value">-</span></div>
      <div class="stat"><span class="label">Month hours</span><span id="month-hours" class="value">-</span></div>
    </section>
    <div id="status" class="status"></div>

    <section class="months">{{MONTHS}}</section>
  </main>

  <script>
    const statusEl = document.getElementById('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type;
    };

    // Only the latest month request may touch the panel.
    let monthRequest = 0;

    const loadMonth = async (block) => {
      const gen = ++monthRequest;
      document.querySelectorAll('.month').forEach((el) => el.classList.toggle('selected', el === block));
      try {
        const res = await fetch(`/api/calendar/monthly?year=${block.dataset.year}&month=${block.dataset.month}`);
        if (!res.ok) {
          throw new Error(await res.text() || 'Unable to load month');
        }
        const stats = await res.json();
        if (gen !== monthRequest) {
          return;
        }
        document.getElementById('month-present').textContent = stats.present_count;
        document.getElementById('month-rate').textContent = `${stats.attendance_rate}%`;
        document.getElementById('month-hours').textContent = stats.total_hours.toFixed(2);
        setStatus('', '');
      } catch (err) {
        if (gen === monthRequest) {
          setStatus(err.message, 'error');
        }
      }
    };

    document.querySelectorAll('.month').forEach((block) => {
      block.addEventListener('click', () => loadMonth(block));
    });

    document.querySelectorAll('[data-action]').forEach((button) => {
      button.addEventListener('click', async () => {
        const res = await fetch('/api/attendance/log', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ action: button.dataset.action })
        });
        if (!res.ok) {
          setStatus(await res.text() || 'Request failed', 'error');
          return;
        }
        window.location.reload();
      });
    });

    const selected = document.querySelector('.month.selected');
    if (selected) {
      loadMonth(selected);
    }
  </script>
</body>
</html>
"#;
