//! ASCII art banner for interactive mode.

use std::io::IsTerminal;

struct Colors {
    frame: &'static str,
    accent: &'static str,
    title: &'static str,
    subtitle: &'static str,
    reset: &'static str,
}

const COLOR: Colors = Colors {
    frame: "\x1b[38;2;120;130;140m",
    accent: "\x1b[38;2;220;165;120m",
    title: "\x1b[1;38;2;220;165;120m",
    subtitle: "\x1b[38;2;100;100;120m",
    reset: "\x1b[0m",
};

const PLAIN: Colors = Colors {
    frame: "",
    accent: "",
    title: "",
    subtitle: "",
    reset: "",
};

/// Prints the closeout banner to stdout.
///
/// Renders ANSI true-color when stdout is a terminal, falls back to plain
/// text otherwise.
pub fn print_banner() {
    let c = if std::io::stdout().is_terminal() {
        &COLOR
    } else {
        &PLAIN
    };

    let fr = c.frame;
    let ac = c.accent;
    let tt = c.title;
    let st = c.subtitle;
    let r = c.reset;

    println!(
        r#"
{fr}  ┌────────────────────┐{r}
{fr}  │{ac}  $  {r}{tt}CLOSEOUT{r}{fr}      │{r}
{fr}  │  {r}safety-gated bids {fr} │{r}
{fr}  └────────────────────┘{r}
{st}  never bid past the ceiling{r}
"#
    );
}
