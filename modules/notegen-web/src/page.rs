//! The single HTML page served at `/`.

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Notegen</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 44rem; margin: 2rem auto; padding: 0 1rem; }
  fieldset { margin-bottom: 1.5rem; }
  label { display: block; margin: .4rem 0; }
  input[type=text], input[type=number] { width: 100%; box-sizing: border-box; }
  pre { background: #f4f4f4; padding: .75rem; white-space: pre-wrap; }
</style>
</head>
<body>
<h1>Notegen</h1>

<fieldset>
  <legend>Settings</legend>
  <label>API URL <input type="text" id="api_url"></label>
  <label>Notes directory <input type="text" id="notes_dir"></label>
  <label>Delay between calls (s) <input type="number" min="0" id="delay_meta_content"></label>
  <label>Delay between rows (s) <input type="number" min="0" id="delay_between_rows"></label>
</fieldset>

<fieldset>
  <legend>One subject</legend>
  <label>Subject <input type="text" id="subject"></label>
  <button id="run-one">Generate</button>
</fieldset>

<fieldset>
  <legend>Batch CSV</legend>
  <input type="file" id="file" accept=".csv,text/csv,text/plain">
  <button id="upload">Upload</button>
</fieldset>

<pre id="result"></pre>

<script>
const fields = ["api_url", "notes_dir", "delay_meta_content", "delay_between_rows"];
const result = document.getElementById("result");

function show(text) { result.textContent = text; }

async function loadConfig() {
  const resp = await fetch("/rpc/config");
  const body = await resp.json();
  if (!body.success) return;
  for (const f of fields) document.getElementById(f).value = body.data[f];
}

function overrides() {
  const out = {};
  for (const f of fields) {
    const v = document.getElementById(f).value.trim();
    if (v === "") continue;
    out[f] = f.startsWith("delay_") ? Number(v) : v;
  }
  return out;
}

document.getElementById("run-one").addEventListener("click", async () => {
  const subject = document.getElementById("subject").value;
  show("Working on " + subject + " ...");
  const resp = await fetch("/rpc/run-one", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ subject, ...overrides() }),
  });
  const body = await resp.json();
  if (!body.success) return show("Error: " + body.error);
  show(body.data.path ? "Created: " + body.data.path : "No output (blank subject)");
});

document.getElementById("upload").addEventListener("click", async () => {
  const form = new FormData();
  for (const [k, v] of Object.entries(overrides())) form.append(k, String(v));
  const file = document.getElementById("file").files[0];
  if (file) form.append("file", file);
  show("Processing batch ...");
  const resp = await fetch("/rpc/upload", { method: "POST", body: form });
  const body = await resp.json();
  if (!body.success) return show("Error: " + body.error);
  const lines = body.data.paths.map(p => "Created: " + p);
  for (const f of body.data.failures) lines.push("Failed: " + f.subject + ": " + f.error);
  if (body.data.aborted) lines.push("Batch stopped after the first failure.");
  show(lines.length ? lines.join("\n") : "No subjects processed.");
});

loadConfig();
</script>
</body>
</html>
"#;
