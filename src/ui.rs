use crate::models::HistoryView;

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn format_ml(value: f64) -> String {
    format!("{value:.0}")
}

fn layout(title: &str, nav: &str, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", title)
        .replace("{{NAV}}", nav)
        .replace("{{BODY}}", body)
}

fn signed_in_nav(username: &str) -> String {
    format!(
        r#"<span class="who">{}</span><a href="/">Today</a><a href="/history">History</a><a href="/goal">Goal</a><a href="/logout">Log out</a>"#,
        escape_html(username)
    )
}

const SIGNED_OUT_NAV: &str = r#"<a href="/login">Log in</a><a href="/register">Register</a>"#;

fn messages(errors: &[String]) -> String {
    errors
        .iter()
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape_html(message)))
        .collect()
}

pub fn render_index(username: &str, date: &str, current: f64, goal: f64) -> String {
    let body = INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{CURRENT}}", &format_ml(current))
        .replace("{{GOAL}}", &format_ml(goal));
    layout("Today", &signed_in_nav(username), &body)
}

pub fn render_login(errors: &[String]) -> String {
    let body = LOGIN_HTML.replace("{{MESSAGES}}", &messages(errors));
    layout("Log in", SIGNED_OUT_NAV, &body)
}

pub fn render_register(errors: &[String]) -> String {
    let body = REGISTER_HTML.replace("{{MESSAGES}}", &messages(errors));
    layout("Register", SIGNED_OUT_NAV, &body)
}

pub fn render_goal(username: &str, current_goal: Option<f64>, errors: &[String]) -> String {
    let summary = match current_goal {
        Some(goal) => format!(
            r#"<p class="subtitle">Your current goal is {} ml a day.</p>"#,
            format_ml(goal)
        ),
        None => r#"<p class="subtitle">Set a daily goal to start tracking.</p>"#.to_string(),
    };
    let body = GOAL_HTML
        .replace("{{SUMMARY}}", &summary)
        .replace("{{MESSAGES}}", &messages(errors));
    layout("Daily goal", &signed_in_nav(username), &body)
}

pub fn render_history(username: &str, view: &HistoryView) -> String {
    let mut months = String::new();
    for month in &view.months {
        months.push_str(&format!(
            r#"<section class="month"><h2>{}</h2><ol class="days">"#,
            escape_html(&month.label)
        ));
        for day in &month.days {
            let class = if day.goal_met { "day met" } else { "day" };
            months.push_str(&format!(
                r#"<li class="{class}"><span class="date">{date}</span><span class="bar"><span style="width: {percent:.0}%"></span></span><span class="amount">{amount} ml</span></li>"#,
                date = &day.date[5..],
                percent = day.percent,
                amount = format_ml(day.current),
            ));
        }
        months.push_str("</ol></section>");
    }

    let body = HISTORY_HTML
        .replace("{{START}}", &view.start_date)
        .replace("{{END}}", &view.end_date)
        .replace("{{GOAL}}", &format_ml(view.goal))
        .replace("{{MONTHS}}", &months);
    layout("History", &signed_in_nav(username), &body)
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Water Tracker</title>
  <style>
    :root {
      --bg-1: #e8f4fb;
      --bg-2: #b9dcf2;
      --ink: #1f2d3a;
      --accent: #2a8bd6;
      --accent-2: #1d4e6f;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(29, 78, 111, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #f4fbff 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      padding: 24px 18px 48px;
    }

    nav {
      width: min(760px, 100%);
      display: flex;
      gap: 16px;
      justify-content: flex-end;
      margin-bottom: 18px;
    }

    nav a {
      color: var(--accent-2);
      font-weight: 600;
      text-decoration: none;
    }

    nav .who {
      margin-right: auto;
      color: #5d6b78;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 22px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .subtitle {
      margin: 0;
      color: #5d6b78;
    }

    form {
      display: grid;
      gap: 12px;
    }

    input, select {
      padding: 12px 14px;
      border-radius: 12px;
      border: 1px solid rgba(29, 78, 111, 0.2);
      font-size: 1rem;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: var(--accent-2);
    }

    .error {
      margin: 0;
      color: #b3261e;
    }

    .gauge {
      height: 22px;
      border-radius: 999px;
      background: rgba(29, 78, 111, 0.1);
      overflow: hidden;
    }

    .gauge span, .bar span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .actions {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
    }

    .days {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 6px;
    }

    .day {
      display: grid;
      grid-template-columns: 64px 1fr 90px;
      align-items: center;
      gap: 10px;
    }

    .bar {
      height: 12px;
      border-radius: 999px;
      background: rgba(29, 78, 111, 0.1);
      overflow: hidden;
    }

    .day.met .bar span {
      background: #2e9d5b;
    }

    .amount {
      text-align: right;
      font-variant-numeric: tabular-nums;
    }
  </style>
</head>
<body>
  <nav>{{NAV}}</nav>
  <main class="app">
{{BODY}}
  </main>
</body>
</html>
"#;

const INDEX_HTML: &str = r#"    <header>
      <h1>Today</h1>
      <p class="subtitle">{{DATE}}</p>
    </header>
    <p><strong id="current">{{CURRENT}}</strong> of <span id="goal">{{GOAL}}</span> ml</p>
    <div class="gauge"><span id="gauge"></span></div>
    <div class="actions">
      <button data-amount="250">+250 ml</button>
      <button data-amount="500">+500 ml</button>
      <button data-amount="750">+750 ml</button>
      <button class="secondary" id="reset">Reset</button>
    </div>
    <p class="error" id="status"></p>
  <script>
    const currentEl = document.getElementById('current');
    const gaugeEl = document.getElementById('gauge');
    const statusEl = document.getElementById('status');
    const goal = Number(document.getElementById('goal').textContent);

    const render = (current) => {
      currentEl.textContent = Math.round(current);
      const percent = goal > 0 ? Math.min(100, (current / goal) * 100) : 0;
      gaugeEl.style.width = `${percent}%`;
    };

    const post = async (url, payload) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(payload)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    document.querySelectorAll('[data-amount]').forEach((button) => {
      button.addEventListener('click', () => {
        post('/add_water', { amount: Number(button.dataset.amount) })
          .then((data) => render(data.updated_current))
          .catch((err) => { statusEl.textContent = err.message; });
      });
    });

    document.getElementById('reset').addEventListener('click', () => {
      post('/reset_water', {})
        .then((data) => render(data.reset_current))
        .catch((err) => { statusEl.textContent = err.message; });
    });

    render(Number(currentEl.textContent));
  </script>"#;

const LOGIN_HTML: &str = r#"    <h1>Log in</h1>
    {{MESSAGES}}
    <form method="post" action="/login">
      <input name="username" placeholder="Username" autocomplete="username" autofocus />
      <input name="password" type="password" placeholder="Password" autocomplete="current-password" />
      <button type="submit">Log in</button>
    </form>"#;

const REGISTER_HTML: &str = r#"    <h1>Register</h1>
    {{MESSAGES}}
    <form method="post" action="/register">
      <input name="username" placeholder="Username" autocomplete="username" autofocus />
      <input name="password" type="password" placeholder="Password" autocomplete="new-password" />
      <input name="confirmation" type="password" placeholder="Confirm password" autocomplete="new-password" />
      <button type="submit">Register</button>
    </form>"#;

const GOAL_HTML: &str = r#"    <h1>Daily goal</h1>
    {{SUMMARY}}
    {{MESSAGES}}
    <form method="post" action="/goal">
      <input name="weight" type="number" step="0.1" min="1" placeholder="Weight (kg)" />
      <select name="activity">
        <option value="1">Sedentary</option>
        <option value="2">Lightly active</option>
        <option value="3">Moderately active</option>
        <option value="4">Very active</option>
        <option value="5">Extremely active</option>
      </select>
      <select name="age">
        <option value="1">Under 30</option>
        <option value="2">30 to 55</option>
        <option value="3">56 to 65</option>
        <option value="4">Over 65</option>
      </select>
      <button type="submit">Save goal</button>
    </form>"#;

const HISTORY_HTML: &str = r#"    <header>
      <h1>History</h1>
      <p class="subtitle">{{START}} to {{END}}, goal {{GOAL}} ml</p>
    </header>
    {{MONTHS}}"#;
