use std::fmt::Display;
use std::io::{self, IsTerminal, Stdout, Write};

use crossterm::style::{StyledContent, Stylize};

pub type StdConsole = Console<Stdout>;

/// Operator-facing output with a little colour.
///
/// Colour is only written when `styled` is set, so piped output stays plain.
pub struct Console<W: Write> {
    out: W,
    styled: bool,
}

impl StdConsole {
    pub fn stdout() -> Self {
        let out = io::stdout();
        let styled = out.is_terminal();
        Self::new(out).styled(styled)
    }
}

impl<W: Write> Console<W> {
    /// Plain output; see [`Console::styled`].
    pub fn new(out: W) -> Self {
        Self { out, styled: false }
    }

    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Print without a newline and flush so the cursor waits after the text.
    pub fn prompt(&mut self, text: impl Display) -> io::Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn heading(&mut self, text: &str) -> io::Result<()> {
        self.paint(text, |t| t.cyan().bold())
    }

    pub fn success(&mut self, text: &str) -> io::Result<()> {
        self.paint(text, |t| t.green())
    }

    pub fn warning(&mut self, text: &str) -> io::Result<()> {
        self.paint(text, |t| t.yellow())
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        self.paint(text, |t| t.red())
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn paint<'a>(
        &mut self,
        text: &'a str,
        style: impl FnOnce(&'a str) -> StyledContent<&'a str>,
    ) -> io::Result<()> {
        if self.styled {
            writeln!(self.out, "{}", style(text))
        } else {
            writeln!(self.out, "{text}")
        }
    }
}
