use crate::models::SharedBoardResponse;
use crate::stats::Summary;

pub fn render_index(username: Option<&str>, summary: &Summary) -> String {
    let (login_hidden, board_hidden) = match username {
        Some(_) => ("hidden", ""),
        None => ("", "hidden"),
    };
    fill_counters(INDEX_HTML, summary)
        .replace("{{LOGIN_HIDDEN}}", login_hidden)
        .replace("{{BOARD_HIDDEN}}", board_hidden)
        .replace("{{ACCOUNT_HIDDEN}}", board_hidden)
        .replace("{{EDIT_HIDDEN}}", "")
        .replace("{{SHARED_HIDDEN}}", "hidden")
        .replace("{{USERNAME}}", &escape_html(username.unwrap_or_default()))
        .replace("{{SNAPSHOT}}", "null")
}

/// Read-only board for a shared snapshot: no login form, no account actions
/// and no editing controls. The page script draws the charts and the entry
/// list from the embedded snapshot instead of calling the API.
pub fn render_shared(board: &SharedBoardResponse) -> Result<String, serde_json::Error> {
    let snapshot = script_json(board)?;
    Ok(fill_counters(INDEX_HTML, &board.summary)
        .replace("{{LOGIN_HIDDEN}}", "hidden")
        .replace("{{BOARD_HIDDEN}}", "")
        .replace("{{ACCOUNT_HIDDEN}}", "hidden")
        .replace("{{EDIT_HIDDEN}}", "hidden")
        .replace("{{SHARED_HIDDEN}}", "")
        .replace("{{USERNAME}}", "")
        .replace("{{SNAPSHOT}}", &snapshot))
}

fn fill_counters(template: &str, summary: &Summary) -> String {
    let stats = &summary.stats;
    template
        .replace("{{TOTAL}}", &stats.total.to_string())
        .replace("{{TODAY}}", &stats.today.to_string())
        .replace("{{WEEK}}", &stats.this_week.to_string())
        .replace("{{MONTH}}", &stats.this_month.to_string())
}

/// JSON safe to inline in a `<script>` block. `<` only appears inside
/// strings, where `\u003c` means the same thing.
fn script_json(value: &impl serde::Serialize) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
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
  <title>Swear Jar</title>
  <style>
    :root {
      --bg: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(900px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    .hidden {
      display: none !important;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .subtitle {
      margin: 4px 0 0;
      color: #5f5c57;
    }

    .panel,
    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .charts {
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
    }

    .stat,
    .card {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .stat .label {
      display: block;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      display: block;
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    form,
    .actions {
      display: flex;
      gap: 10px;
      flex-wrap: wrap;
    }

    input {
      flex: 1;
      min-width: 180px;
      border-radius: 999px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      padding: 12px 18px;
      font-size: 1rem;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: var(--accent-2);
    }

    .card h2 {
      margin: 0 0 12px;
      font-size: 1.2rem;
    }

    svg {
      width: 100%;
      height: 200px;
      display: block;
    }

    .bar {
      fill: var(--accent);
    }

    .line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .label {
      fill: #7a746d;
      font-size: 11px;
    }

    .empty {
      color: #8b857d;
      text-align: center;
      padding: 48px 0;
    }

    ul {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      gap: 8px;
    }

    li {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    li button {
      padding: 4px 10px;
      background: transparent;
      color: #c63b2b;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Swear Jar</h1>
        <p class="subtitle">Track your swearing habits and see your progress over time.</p>
        <p class="subtitle {{SHARED_HIDDEN}}" id="shared-note">Shared board (read-only). <a href="/">Start your own jar</a></p>
      </div>
      <div class="actions {{ACCOUNT_HIDDEN}}" id="account">
        <span id="username">{{USERNAME}}</span>
        <button class="secondary" id="share-btn" type="button">Share URL</button>
        <button class="secondary" id="logout-btn" type="button">Logout</button>
      </div>
    </header>

    <section class="card {{LOGIN_HIDDEN}}" id="login">
      <h2>Who are you?</h2>
      <form id="login-form">
        <input id="login-input" placeholder="Username" autocomplete="username" />
        <button type="submit">Continue</button>
      </form>
    </section>

    <div class="{{BOARD_HIDDEN}}" id="board" style="display: grid; gap: 24px;">
      <form class="{{EDIT_HIDDEN}}" id="add-form">
        <input id="word-input" placeholder="Enter a word..." />
        <button type="submit">Add</button>
      </form>

      <section class="panel">
        <div class="stat"><span class="label">Total</span><span class="value" id="total">{{TOTAL}}</span></div>
        <div class="stat"><span class="label">Today</span><span class="value" id="today">{{TODAY}}</span></div>
        <div class="stat"><span class="label">This week</span><span class="value" id="week">{{WEEK}}</span></div>
        <div class="stat"><span class="label">This month</span><span class="value" id="month">{{MONTH}}</span></div>
      </section>

      <section class="charts">
        <div class="card">
          <h2>Top Words</h2>
          <svg id="top-chart" viewBox="0 0 400 200" role="img" aria-label="Top words"></svg>
        </div>
        <div class="card">
          <h2>Last 7 Days</h2>
          <svg id="trend-chart" viewBox="0 0 400 200" role="img" aria-label="Daily trend"></svg>
        </div>
      </section>

      <section class="card">
        <div class="actions" style="justify-content: space-between;">
          <h2>Recent Entries</h2>
          <button class="secondary {{EDIT_HIDDEN}}" id="clear-btn" type="button">Clear all</button>
        </div>
        <ul id="entries"></ul>
      </section>
    </div>
  </main>

  <script>
    const snapshot = {{SNAPSHOT}};
    const $ = (id) => document.getElementById(id);
    const escapeText = (text) => {
      const span = document.createElement('span');
      span.textContent = text;
      return span.innerHTML;
    };

    const request = async (method, path, body) => {
      const res = await fetch(path, {
        method,
        headers: body ? { 'content-type': 'application/json' } : {},
        body: body ? JSON.stringify(body) : undefined
      });
      const data = await res.json().catch(() => ({}));
      if (res.status === 401) {
        showLogin();
        throw new Error('Please log in');
      }
      if (!res.ok) {
        throw new Error(data.error || 'Request failed');
      }
      return data;
    };

    const showLogin = () => {
      $('login').classList.remove('hidden');
      $('board').classList.add('hidden');
      $('account').classList.add('hidden');
    };

    const showBoard = (username) => {
      $('username').textContent = username;
      $('login').classList.add('hidden');
      $('board').classList.remove('hidden');
      $('account').classList.remove('hidden');
    };

    const emptyState = (svg) => {
      svg.innerHTML = '<text class="label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
    };

    const renderBars = (svg, points) => {
      if (!points.length) {
        return emptyState(svg);
      }
      const max = Math.max(...points.map((p) => p.count));
      const width = 400 / points.length;
      svg.innerHTML = points
        .map((p, i) => {
          const h = (p.count / max) * 150;
          const x = i * width + 10;
          return `<rect class="bar" x="${x}" y="${170 - h}" width="${width - 20}" height="${h}" rx="8" />` +
            `<text class="label" x="${x + (width - 20) / 2}" y="190" text-anchor="middle">${escapeText(p.word)} (${p.count})</text>`;
        })
        .join('');
    };

    const renderLine = (svg, points) => {
      if (!points.length) {
        return emptyState(svg);
      }
      const max = Math.max(...points.map((p) => p.count));
      const step = points.length > 1 ? 360 / (points.length - 1) : 0;
      const x = (i) => 20 + i * step;
      const y = (v) => 170 - (v / max) * 150;
      const path = points.map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(i)} ${y(p.count)}`).join(' ');
      const labels = points
        .map((p, i) => `<text class="label" x="${x(i)}" y="190" text-anchor="middle">${p.date.slice(5)}</text>`)
        .join('');
      svg.innerHTML = `<path class="line" d="${path}" />${labels}`;
    };

    const renderEntries = (entries, readOnly) => {
      $('entries').innerHTML = entries.length
        ? entries
            .map((e) => `<li><span>${escapeText(e.word)} <small>${new Date(e.timestamp).toLocaleString()}</small></span>` +
              (readOnly ? '' : `<button type="button" data-id="${escapeText(e.id)}">Delete</button>`) + '</li>')
            .join('')
        : '<li class="empty">No entries yet</li>';
    };

    const renderSummary = (summary) => {
      $('total').textContent = summary.stats.total;
      $('today').textContent = summary.stats.today;
      $('week').textContent = summary.stats.thisWeek;
      $('month').textContent = summary.stats.thisMonth;
      renderBars($('top-chart'), summary.topWords);
      renderLine($('trend-chart'), summary.trend);
    };

    const refresh = async (entries) => {
      const list = entries || (await request('GET', '/entries')).entries;
      renderEntries(list);
      renderSummary(await request('GET', '/stats'));
    };

    const fail = (err) => alert(err.message);

    $('login-form').addEventListener('submit', (event) => {
      event.preventDefault();
      request('POST', '/login', { username: $('login-input').value })
        .then((data) => {
          showBoard(data.username);
          return refresh();
        })
        .catch(fail);
    });

    $('add-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const word = $('word-input').value;
      if (!word.trim()) {
        return;
      }
      request('POST', '/entries', { word })
        .then((data) => {
          $('word-input').value = '';
          return refresh(data.entries);
        })
        .catch(fail);
    });

    $('entries').addEventListener('click', (event) => {
      const id = event.target.dataset && event.target.dataset.id;
      if (!id) {
        return;
      }
      request('DELETE', `/entries/${encodeURIComponent(id)}`)
        .then((data) => refresh(data.entries))
        .catch(fail);
    });

    $('clear-btn').addEventListener('click', () => {
      if (!confirm('Are you sure you want to clear all entries?')) {
        return;
      }
      request('DELETE', '/entries').then(() => refresh([])).catch(fail);
    });

    $('share-btn').addEventListener('click', () => {
      request('GET', '/share')
        .then((data) => {
          const link = data.url;
          return navigator.clipboard
            ? navigator.clipboard.writeText(link).then(() => alert('Link copied'))
            : prompt('Copy this link:', link);
        })
        .catch(fail);
    });

    $('logout-btn').addEventListener('click', () => {
      request('POST', '/logout').then(showLogin).catch(fail);
    });

    if (snapshot) {
      renderEntries(snapshot.entries, true);
      renderSummary(snapshot.summary);
    } else if (!$('board').classList.contains('hidden')) {
      refresh().catch(fail);
    }
  </script>
</body>
</html>
"#;
