//! ANSI palette shared by the prompt highlighter and CLI reports.

pub mod palette {
    use nu_ansi_term::Color;

    // Catppuccin Mocha accents.
    pub const RED: Color = Color::Rgb(243, 139, 168);
    pub const GREEN: Color = Color::Rgb(166, 227, 161);
    pub const YELLOW: Color = Color::Rgb(249, 226, 175);
    pub const MAUVE: Color = Color::Rgb(203, 166, 247);
    pub const PEACH: Color = Color::Rgb(250, 179, 135);
    pub const TEAL: Color = Color::Rgb(148, 226, 213);
    pub const SKY: Color = Color::Rgb(137, 220, 235);

    // Subtle dim for comment text.
    pub const OVERLAY: Color = Color::Rgb(108, 112, 134);
}
