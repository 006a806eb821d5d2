use crate::models::{Hizb, ProgressSummary, ReaderPane, ReadingBlock, StatusKind};
use crate::state::Session;
use std::fmt::Write;

pub fn render_index(session: &Session, summary: &ProgressSummary) -> String {
    let title = match session.selected {
        Some(hizb) => format!("Hizb {hizb}"),
        None => "No hizb selected".to_string(),
    };

    // Remote text goes in last so it is never scanned for placeholders.
    INDEX_HTML
        .replace("{{GRID}}", &render_grid(session))
        .replace("{{TITLE}}", &title)
        .replace("{{STATUS_TYPE}}", status_type(session))
        .replace("{{STATUS}}", &escape_html(&session.status.message))
        .replace("{{DONE_COUNT}}", &summary.done_count.to_string())
        .replace("{{REMAINING}}", &summary.remaining.to_string())
        .replace("{{PERCENT}}", &format!("{:.1}", summary.percent))
        .replace("{{JUZ}}", &summary.juz_completed.to_string())
        .replace("{{DONE_DISABLED}}", disabled(!session.can_mark_done()))
        .replace("{{UNDO_DISABLED}}", disabled(!session.can_undo()))
        .replace("{{READER}}", &render_pane(&session.pane))
}

fn render_grid(session: &Session) -> String {
    let mut grid = String::new();
    for hizb in Hizb::all() {
        let mut class = String::from("hizb");
        if session.progress.is_done(hizb) {
            class.push_str(" done");
        }
        if session.selected == Some(hizb) {
            class.push_str(" active");
        }
        let _ = writeln!(
            grid,
            r#"<button class="{class}" type="submit" name="hizb" value="{hizb}">{hizb}</button>"#
        );
    }
    grid
}

fn render_pane(pane: &ReaderPane) -> String {
    match pane {
        ReaderPane::Empty => {
            r#"<div class="empty">Pick a hizb from the grid to start reading.</div>"#.to_string()
        }
        ReaderPane::Loading { hizb } => {
            format!(r#"<div class="empty">Loading hizb {hizb}...</div>"#)
        }
        ReaderPane::Ready { blocks, .. } => blocks.iter().map(render_block).collect(),
        ReaderPane::Failed { message, .. } => {
            format!(r#"<div class="error">{}</div>"#, escape_html(message))
        }
    }
}

fn render_block(block: &ReadingBlock) -> String {
    let mut html = format!(
        r#"<div class="surah-header">{} ({})</div>"#,
        escape_html(&block.surah_name),
        block.surah_number
    );
    for ayah in &block.ayahs {
        let _ = write!(
            html,
            r#"<p class="ayah"><span>{}</span> <span class="ayah-num">&#xFD3F;{}&#xFD3E;</span></p>"#,
            escape_html(&ayah.text),
            ayah.number_in_surah
        );
    }
    html
}

fn status_type(session: &Session) -> &'static str {
    match session.status.kind {
        StatusKind::Info => "info",
        StatusKind::Ok => "ok",
        StatusKind::Error => "error",
    }
}

fn disabled(flag: bool) -> &'static str {
    if flag { "disabled" } else { "" }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Hizb Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Amiri:wght@400;700&display=swap');

    :root {
      --bg-1: #f4f1e8;
      --bg-2: #d9e6d3;
      --ink: #23302a;
      --accent: #2f7d5b;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #eef3e6 60%, #f7f5ee 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(2rem, 4vw, 2.6rem);
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
    }

    .summary {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(56px, 1fr));
      gap: 8px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 14px;
      padding: 12px 10px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
    }

    button:disabled {
      opacity: 0.45;
      cursor: not-allowed;
    }

    .hizb {
      background: white;
      color: var(--ink);
      border: 1px solid rgba(47, 72, 88, 0.15);
    }

    .hizb.done {
      background: var(--accent);
      color: white;
    }

    .hizb.active {
      outline: 3px solid var(--accent-2);
    }

    .actions {
      display: flex;
      gap: 12px;
      flex-wrap: wrap;
    }

    .btn-done {
      background: var(--accent);
      color: white;
    }

    .btn-undo {
      background: var(--accent-2);
      color: white;
    }

    .reader {
      background: white;
      border-radius: 20px;
      padding: 20px 24px;
      direction: rtl;
      font-family: "Amiri", "Times New Roman", serif;
      font-size: 1.5rem;
      line-height: 2.3;
    }

    .surah-header {
      text-align: center;
      font-weight: 700;
      margin: 18px 0 8px;
      color: var(--accent-2);
    }

    .ayah {
      margin: 0;
    }

    .ayah-num {
      color: var(--accent);
    }

    .empty,
    .error {
      direction: ltr;
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      font-size: 1rem;
    }

    .error {
      color: #c63b2b;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Hizb Tracker</h1>
      <p class="subtitle">Sixty hizb, read one at a time. Progress is saved on every mark.</p>
    </header>

    <section class="summary">
      <div class="stat"><span class="label">Read</span><span class="value" id="done-count">{{DONE_COUNT}}</span></div>
      <div class="stat"><span class="label">Remaining</span><span class="value" id="remaining">{{REMAINING}}</span></div>
      <div class="stat"><span class="label">Complete</span><span class="value" id="percent">{{PERCENT}}%</span></div>
      <div class="stat"><span class="label">Juz finished</span><span class="value" id="juz">{{JUZ}}</span></div>
    </section>

    <form class="grid" id="grid" method="post" action="/open">
{{GRID}}    </form>

    <section class="actions">
      <h2 id="title">{{TITLE}}</h2>
      <form method="post" action="/progress/done">
        <button class="btn-done" id="done-btn" type="submit" {{DONE_DISABLED}}>Mark done</button>
      </form>
      <form method="post" action="/progress/undo">
        <button class="btn-undo" id="undo-btn" type="submit" {{UNDO_DISABLED}}>Undo</button>
      </form>
    </section>

    <div class="status" id="status" data-type="{{STATUS_TYPE}}">{{STATUS}}</div>

    <section class="reader" id="reader">{{READER}}</section>
  </main>
</body>
</html>
"#;
