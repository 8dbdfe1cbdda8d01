use axum::response::Html;

const INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>speechgate</title>
</head>
<body>
<h1>speechgate</h1>
<p>Every endpoint below requires <code>Authorization: Bearer &lt;token&gt;</code>.</p>
<ol>
<li><code>GET /tts?t=[text]&amp;v=[voice]&amp;r=[rate]&amp;p=[pitch]&amp;o=[outputFormat]&amp;download=[true]</code></li>
<li><code>POST /tts</code> with a JSON body <code>{"t", "v", "r", "p", "o"}</code></li>
<li><code>GET /voices?l=[locale, e.g. zh or zh-CN]&amp;d&amp;f=[1]</code></li>
<li><code>GET /v1/models</code></li>
<li><code>POST /v1/audio/speech</code> with a JSON body <code>{"model", "input", "voice", "response_format", "speed", "stream"}</code></li>
</ol>
</body>
</html>
"#;

/// Public landing page describing the API
pub async fn index() -> Html<&'static str> {
    Html(INDEX)
}
