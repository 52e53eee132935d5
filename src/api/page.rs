use std::fmt::Write;

use crate::error::AppError;
use crate::tts::DEFAULT_VOICE;

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Flite Synthesis Demo</title>
  <meta charset="utf-8">
  <script type="text/javascript">
    function play_tts() {
      var text = document.getElementById('textarea').value;
      var select = document.getElementById('voice');
      var voice = select.options[select.selectedIndex].value;
      var audio = document.getElementById('player');
      audio.setAttribute('src', '/wav?text=' + encodeURIComponent(text) + '&voice=' + encodeURIComponent(voice));
      audio.play();
    }
  </script>
</head>
<body>
  <h1>Flite Synthesis Demo</h1>

  Choose Voice:
  <select id="voice">
"#;

const TAIL: &str = r#"  </select> <br /> <br />
  <textarea rows=3 cols=80 id="textarea" name="text">A whole joy was reaping, but they've gone south. Go fetch azure mike!</textarea>
  <br /> <br />
  <input type="submit" value="Speak!" onclick="play_tts();"> <br />
  <audio id="player"></audio>
  <br />
  <small>Powered by <a href="http://www.festvox.org/flite/">Flite</a>.</small>
</body>
</html>
"#;

/// Render the control page listing `voices` plus the default voice.
pub fn render_index(voices: &[String]) -> Result<String, AppError> {
    let mut page = String::with_capacity(HEAD.len() + TAIL.len() + voices.len() * 64);
    page.push_str(HEAD);

    for voice in voices {
        let voice = escape_html(voice);
        writeln!(page, "    <option value=\"{}\">{}</option>", voice, voice)?;
    }
    writeln!(
        page,
        "    <option value=\"{0}\">{0}</option>",
        DEFAULT_VOICE
    )?;

    page.push_str(TAIL);
    Ok(page)
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
