//! Shared fixtures: a dispatcher wired to a fake `/bin/sh` renderer.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use deckhand_core::{DeckService, Renderer, RendererCommand, WorkRoot};
use deckhand_server::{Dispatcher, Resources};

/// Writes one PNG per `---` separated slide, or the input as the document.
const OK_SCRIPT: &str = r#"
format=""
output=""
while [ $# -gt 0 ]; do
  case "$1" in
    --format) format="$2"; shift 2 ;;
    --output) output="$2"; shift 2 ;;
    *) shift ;;
  esac
done
if [ "$format" = "png" ]; then
  mkdir -p "$output"
  n=$(grep -c '^---$' slides.md || true)
  n=$((n + 1))
  i=1
  while [ $i -le $n ]; do
    echo "png $i" > "$output/$i.png"
    i=$((i + 1))
  done
else
  cat slides.md > "$output"
fi
"#;

const FAIL_SCRIPT: &str = "echo 'renderer crashed' >&2\nexit 1\n";

fn dispatcher_with(dir: &Path, script: &str) -> Arc<Dispatcher> {
    let path = dir.join("renderer.sh");
    std::fs::write(&path, script).expect("Failed to write script");
    let deck = DeckService::new(
        WorkRoot::new(dir.join("runs")),
        Renderer::new(RendererCommand::new("/bin/sh", [path.display().to_string()])),
    );
    Arc::new(Dispatcher::new(deck, Resources::default()))
}

/// Dispatcher whose renderer succeeds.
pub fn dispatcher(dir: &Path) -> Arc<Dispatcher> {
    dispatcher_with(dir, OK_SCRIPT)
}

/// Dispatcher whose renderer always fails.
pub fn failing_dispatcher(dir: &Path) -> Arc<Dispatcher> {
    dispatcher_with(dir, FAIL_SCRIPT)
}
