use crate::config::ScoutConfig;
use crate::logbook::Logbook;
use crate::stats::{compute_score, Frequencies};
use std::fmt::Write;

pub fn render_index(config: &ScoutConfig, log: &Logbook, frequencies: &Frequencies) -> String {
    INDEX_HTML
        .replace("{{COLUMNS}}", &config.outcomes.len().to_string())
        .replace("{{BUTTONS}}", &render_buttons(config))
        .replace("{{SCORES}}", &render_scores(config, frequencies))
        .replace("{{LINES}}", &log.line_count().to_string())
        .replace("{{LOG}}", &escape_html(log.text()))
}

fn render_buttons(config: &ScoutConfig) -> String {
    let mut html = String::new();
    for (entry, code) in config.entry_codes() {
        let category = &config.categories[entry.category];
        let code = escape_html(&code);
        let _ = writeln!(
            html,
            r#"      <form method="post" action="/click"><button class="log-button" type="submit" name="code" value="{code}" data-code="{code}" style="background: {color}" title="{label}">{code}</button></form>"#,
            color = escape_html(&category.color),
            label = escape_html(&category.label),
        );
    }
    html
}

fn render_scores(config: &ScoutConfig, frequencies: &Frequencies) -> String {
    let mut html = String::new();
    for (index, category) in config.categories.iter().enumerate() {
        let _ = writeln!(
            html,
            r#"      <div class="stat" style="border-color: {color}"><span class="label">{label}</span><span class="value" data-score="{code}">{score}</span></div>"#,
            color = escape_html(&category.color),
            label = escape_html(&category.label),
            code = escape_html(&category.code),
            score = compute_score(config, index, frequencies),
        );
    }
    html
}

pub fn render_clear_confirm(lines: usize) -> String {
    CLEAR_CONFIRM_HTML.replace("{{LINES}}", &lines.to_string())
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Scout Logger</title>
  <style>
    :root {
      --bg: #f3f4f6;
      --ink: #1f2937;
      --muted: #6b7280;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(31, 41, 55, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      display: grid;
      place-items: center;
      padding: 24px 14px 40px;
    }

    .app {
      width: min(720px, 100%);
      background: var(--card);
      border-radius: 22px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 22px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 4vw, 2.2rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    #button-grid {
      display: grid;
      grid-template-columns: repeat({{COLUMNS}}, 1fr);
      gap: 12px;
    }

    #button-grid form {
      margin: 0;
    }

    .log-button {
      width: 100%;
      border: none;
      border-radius: 999px;
      padding: 18px 0;
      font-size: 1.3rem;
      font-weight: 700;
      color: white;
      cursor: pointer;
      transition: transform 120ms ease;
    }

    .log-button:active {
      transform: scale(0.96);
    }

    .scores {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(130px, 1fr));
      gap: 12px;
    }

    .stat {
      border: 2px solid;
      border-radius: 14px;
      padding: 12px;
      display: grid;
      gap: 4px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
    }

    textarea {
      width: 100%;
      min-height: 220px;
      font-family: ui-monospace, monospace;
      font-size: 0.9rem;
      border-radius: 12px;
      border: 1px solid #d1d5db;
      padding: 10px;
    }

    .controls {
      display: flex;
      gap: 12px;
      flex-wrap: wrap;
    }

    .controls button {
      border: none;
      border-radius: 10px;
      padding: 12px 18px;
      font-weight: 600;
      cursor: pointer;
    }

    #download-btn {
      background: #1f2937;
      color: white;
    }

    #clear-btn {
      background: #fee2e2;
      color: #b91c1c;
    }

    .score-notification {
      position: fixed;
      top: 16px;
      left: 50%;
      transform: translateX(-50%);
      padding: 12px 18px;
      border-radius: 10px;
      color: white;
      font-weight: 700;
      box-shadow: var(--shadow);
      transition: opacity 300ms ease;
      z-index: 50;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Scout Logger</h1>
      <p class="subtitle"><span id="line-count">{{LINES}}</span> entries logged</p>
    </header>

    <section id="button-grid">
{{BUTTONS}}    </section>

    <section class="scores">
{{SCORES}}    </section>

    <textarea id="log-content" readonly>{{LOG}}</textarea>

    <section class="controls">
      <button id="download-btn" type="button">Download</button>
      <form id="clear-form" method="get" action="/clear">
        <button id="clear-btn" type="submit">Clear</button>
      </form>
    </section>
  </main>

  <script>
    const logArea = document.getElementById('log-content');
    const lineCount = document.getElementById('line-count');

    const showLog = (text) => {
      logArea.value = text;
      logArea.scrollTop = logArea.scrollHeight;
      lineCount.textContent = text.split('\n').filter((line) => line.trim()).length;
    };

    const showScoreNotification = (entry) => {
      document.querySelectorAll('.score-notification').forEach((n) => n.remove());
      const notification = document.createElement('div');
      notification.className = 'score-notification';
      notification.style.backgroundColor = entry.color || '#4b5563';
      notification.textContent = `New evaluation for ${entry.category}: ${entry.score}`;
      document.body.appendChild(notification);
      setTimeout(() => {
        notification.style.opacity = '0';
        setTimeout(() => notification.remove(), 300);
      }, 3000);
    };

    const logEntry = async (code) => {
      const res = await fetch('/api/entries', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ code })
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      const entry = await res.json();
      showLog(logArea.value + entry.line);
      const badge = document.querySelector(`[data-score="${CSS.escape(entry.category)}"]`);
      if (badge) {
        badge.textContent = entry.score;
      }
      showScoreNotification(entry);
    };

    const download = async (url, filename) => {
      const res = await fetch(url);
      if (!res.ok) {
        window.alert((await res.text()) || 'Download failed');
        return;
      }
      const blob = await res.blob();
      const link = document.createElement('a');
      link.href = URL.createObjectURL(blob);
      link.download = filename;
      document.body.appendChild(link);
      link.click();
      document.body.removeChild(link);
      URL.revokeObjectURL(link.href);
    };

    document.getElementById('button-grid').addEventListener('click', (event) => {
      const button = event.target.closest('.log-button');
      if (!button) {
        return;
      }
      event.preventDefault();
      logEntry(button.dataset.code).catch((err) => window.alert(err.message));
    });

    document.getElementById('download-btn').addEventListener('click', async () => {
      await download('/export/log', 'Scouting_Log.csv');
      await download('/export/summary', 'Scouting_Summary.csv');
    });

    document.getElementById('clear-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      if (!window.confirm("Are you sure to clear the Content ? You can't undo this operation.")) {
        return;
      }
      const res = await fetch('/api/clear', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ confirm: true })
      });
      if (res.ok) {
        window.location.reload();
      }
    });

    showLog(logArea.value);
  </script>
</body>
</html>
"#;

const CLEAR_CONFIRM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Clear scouting log</title>
  <style>
    body {
      margin: 0;
      min-height: 100vh;
      display: grid;
      place-items: center;
      background: #f3f4f6;
      color: #1f2937;
      font-family: "Inter", "Segoe UI", sans-serif;
    }

    .card {
      background: white;
      border-radius: 18px;
      padding: 28px;
      display: grid;
      gap: 18px;
      max-width: 420px;
    }

    .choices {
      display: flex;
      gap: 12px;
    }

    button {
      border: none;
      border-radius: 10px;
      padding: 12px 18px;
      font-weight: 600;
      cursor: pointer;
    }

    .yes {
      background: #b91c1c;
      color: white;
    }
  </style>
</head>
<body>
  <main class="card">
    <p>Are you sure to clear the Content ? You can't undo this operation.</p>
    <p>{{LINES}} entries will be removed.</p>
    <div class="choices">
      <form method="post" action="/clear">
        <input type="hidden" name="confirm" value="no" />
        <button type="submit">No</button>
      </form>
      <form method="post" action="/clear">
        <input type="hidden" name="confirm" value="yes" />
        <button class="yes" type="submit">Yes</button>
      </form>
    </div>
  </main>
</body>
</html>
"#;
