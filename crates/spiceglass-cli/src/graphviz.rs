//! GraphViz rendering helpers
//!
//! DOT text is produced in-process; raster and vector output shell out to
//! the external `dot` tool over a stdin/stdout pipe. Inline terminal
//! display uses the iTerm2 image escape sequence.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::ValueEnum;
use spiceglass_core::{Error, Result};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Output format for the graph command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    /// GraphViz source text
    Dot,
    /// Raster image, laid out by the external `dot` tool
    Png,
    /// Vector image, laid out by the external `dot` tool
    Svg,
}

impl GraphFormat {
    /// The value passed to `dot -T`.
    pub fn dot_arg(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Pipe DOT source through the external `dot` tool and collect the
/// rendered bytes.
pub async fn render_with_dot(source: &str, format: GraphFormat) -> Result<Vec<u8>> {
    debug!(format = format.dot_arg(), "invoking dot");

    let mut child = Command::new("dot")
        .arg(format!("-T{}", format.dot_arg()))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            Error::render(format!(
                "failed to start `dot`: {e}; is GraphViz installed?"
            ))
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(source.as_bytes())
            .await
            .map_err(|e| Error::render(format!("failed to write to `dot`: {e}")))?;
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| Error::render(format!("failed to wait for `dot`: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::render(format!(
            "`dot` exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(output.stdout)
}

/// Render DOT source to PNG and print it as an inline terminal image.
pub async fn display_graph(source: &str) -> Result<()> {
    let image = render_with_dot(source, GraphFormat::Png).await?;
    println!("{}", inline_image_escape(&image));
    Ok(())
}

/// Escape sequence that renders an image inline in iTerm2-compatible
/// terminals.
fn inline_image_escape(image: &[u8]) -> String {
    format!(
        "\x1b]1337;File=inline=1;height=800px:{}\x07",
        STANDARD.encode(image)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_arg_matches_format() {
        assert_eq!(GraphFormat::Dot.dot_arg(), "dot");
        assert_eq!(GraphFormat::Png.dot_arg(), "png");
        assert_eq!(GraphFormat::Svg.dot_arg(), "svg");
    }

    #[test]
    fn test_inline_image_escape_wraps_base64() {
        let escape = inline_image_escape(b"hi");
        assert_eq!(escape, "\x1b]1337;File=inline=1;height=800px:aGk=\x07");
    }

    #[test]
    fn test_inline_image_escape_of_empty_input() {
        let escape = inline_image_escape(b"");
        assert_eq!(escape, "\x1b]1337;File=inline=1;height=800px:\x07");
    }
}
