use console::{style, StyledObject};

/// Styling helpers for terminal output
pub fn bright_yellow(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn bright_green(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn dim(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn bright(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright()
}

pub fn magenta_bold(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

/// Semantic colours of the status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Clean state and repository names
    Clean,
    Stable,
    /// Pending release and merge request headers
    Pending,
    Unaligned,
    /// De-emphasized metadata
    Muted,
    /// Informational branch listing
    Info,
}

/// Applies report colours, or none at all when `colored` is off.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    colored: bool,
}

impl Palette {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn paint(&self, tone: Tone, text: impl std::fmt::Display) -> String {
        let styled = style(text.to_string());
        let styled = match tone {
            Tone::Clean => styled.green(),
            Tone::Stable => styled.yellow(),
            Tone::Pending => styled.cyan(),
            Tone::Unaligned => styled.red(),
            Tone::Muted => styled.color256(8),
            Tone::Info => styled.white().italic(),
        };
        styled.force_styling(self.colored).to_string()
    }
}
