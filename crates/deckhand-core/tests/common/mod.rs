//! Fake renderer used by the pipeline tests.
//!
//! The script is run through `/bin/sh` rather than executed directly, so it
//! needs no execute bit.

#![allow(dead_code)]

use std::path::Path;

use deckhand_core::{DeckService, Renderer, RendererCommand, WorkRoot};

/// How the fake renderer behaves.
#[derive(Debug, Clone, Copy)]
pub enum Mode {
    /// Produce one image per `---` separated slide, or a document that is
    /// the input prefixed with the format name.
    Ok,
    /// Print to stderr and exit with status 3.
    Fail,
    /// Exit successfully without writing anything.
    Silent,
}

const SCRIPT: &str = r#"
format=""
output=""
theme=""
while [ $# -gt 0 ]; do
  case "$1" in
    --format) format="$2"; shift 2 ;;
    --output) output="$2"; shift 2 ;;
    --theme) theme="$2"; shift 2 ;;
    *) shift ;;
  esac
done
"#;

fn body(mode: Mode) -> &'static str {
    match mode {
        Mode::Ok => {
            r#"
echo "rendering $format with $theme"
if [ "$format" = "png" ]; then
  mkdir -p "$output"
  n=$(grep -c '^---$' slides.md || true)
  n=$((n + 1))
  i=1
  while [ $i -le $n ]; do
    { echo "slide $i theme $theme"; cat slides.md; } > "$output/$i.png"
    i=$((i + 1))
  done
  echo "not an image" > "$output/log.txt"
else
  { echo "$format"; cat slides.md; } > "$output"
fi
"#
        }
        Mode::Fail => {
            r#"
echo "boom: cannot load theme $theme" >&2
exit 3
"#
        }
        Mode::Silent => "exit 0\n",
    }
}

/// Write the fake renderer into `dir` and return a command running it.
pub fn fake_renderer(dir: &Path, mode: Mode) -> RendererCommand {
    let script = dir.join(format!("fake-renderer-{mode:?}.sh"));
    std::fs::write(&script, format!("{SCRIPT}{}", body(mode))).expect("Failed to write script");
    RendererCommand::new("/bin/sh", [script.display().to_string()])
}

/// A service with its work root and fake renderer inside `dir`.
pub fn service(dir: &Path, mode: Mode) -> DeckService {
    DeckService::new(
        WorkRoot::new(dir.join("runs")),
        Renderer::new(fake_renderer(dir, mode)),
    )
}
