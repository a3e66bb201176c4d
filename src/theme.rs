//! Handle the color theme
use ratatui::style::{Color, Modifier, Style};

use crate::options::ShelfOptions;

/// The color scheme of shelf's UI
///
/// <pre>
/// +- 2/20 ---------------------+
/// |> red                        |  --> prompt & query & info/spinner
/// +-----------------------------+
/// |  Red Shirt      img/1.png   |  --> normal & matched & image
/// |> Red Hat        img/3.png   |  --> cursor & current & current_match
/// +-----------------------------+
/// </pre>
#[derive(Copy, Clone, Debug, Default)]
pub struct ColorTheme {
    /// Non-active rows and general text
    pub normal: Style,
    /// Matched text on non-active rows
    pub matched: Style,
    /// Active row, non-matched text
    pub current: Style,
    /// Active row, matched text
    pub current_match: Style,
    /// Query text
    pub query: Style,
    /// Placeholder shown while the query is empty
    pub placeholder: Style,
    /// Spinner
    pub spinner: Style,
    /// Info (matched/total counter)
    pub info: Style,
    /// Prompt prefix
    pub prompt: Style,
    /// Pointer in front of the active row
    pub cursor: Style,
    /// Thumbnail reference column
    pub image: Style,
    /// Borders
    pub border: Style,
    /// Selection notice
    pub notice: Style,
}

impl ColorTheme {
    /// Setup the theme from the options
    pub fn init_from_options(options: &ShelfOptions) -> ColorTheme {
        if let Some(color) = options.color.as_deref() {
            ColorTheme::from_options(color)
        } else {
            match std::env::var_os("NO_COLOR") {
                Some(no_color) if !no_color.is_empty() => ColorTheme::none(),
                _ => ColorTheme::dark256(),
            }
        }
    }

    fn none() -> Self {
        Self {
            spinner: Style::default().add_modifier(Modifier::BOLD),
            placeholder: Style::default().add_modifier(Modifier::DIM),
            image: Style::default().add_modifier(Modifier::DIM),
            notice: Style::default().add_modifier(Modifier::BOLD),
            ..ColorTheme::default()
        }
    }

    fn bw() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.add_modifier(Modifier::UNDERLINED),
            current: base.current.add_modifier(Modifier::REVERSED),
            current_match: base
                .current_match
                .add_modifier(Modifier::REVERSED | Modifier::UNDERLINED),
            ..base
        }
    }

    fn default16() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.fg(Color::Green),
            current: base.current.fg(Color::Yellow),
            current_match: base.current_match.fg(Color::Green),
            spinner: base.spinner.fg(Color::Green),
            info: base.info.fg(Color::White),
            prompt: base.prompt.fg(Color::Blue),
            cursor: base.cursor.fg(Color::Red),
            border: base.border.fg(Color::DarkGray),
            notice: base.notice.fg(Color::Cyan),
            ..base
        }
    }

    fn dark256() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.fg(Color::Indexed(108)),
            current: base.current.bg(Color::Indexed(236)),
            current_match: base.current_match.fg(Color::Indexed(151)).bg(Color::Indexed(236)),
            spinner: base.spinner.fg(Color::Indexed(148)),
            info: base.info.fg(Color::Indexed(144)),
            prompt: base.prompt.fg(Color::Indexed(110)),
            cursor: base.cursor.fg(Color::Indexed(161)),
            image: base.image.fg(Color::Indexed(243)),
            border: base.border.fg(Color::Indexed(59)),
            notice: base.notice.fg(Color::Indexed(151)),
            ..base
        }
    }

    fn light256() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.fg(Color::Indexed(0)).bg(Color::Indexed(220)),
            current: base.current.bg(Color::Indexed(251)),
            current_match: base.current_match.fg(Color::Indexed(66)).bg(Color::Indexed(251)),
            spinner: base.spinner.fg(Color::Indexed(65)),
            info: base.info.fg(Color::Indexed(101)),
            prompt: base.prompt.fg(Color::Indexed(25)),
            cursor: base.cursor.fg(Color::Indexed(161)),
            image: base.image.fg(Color::Indexed(244)),
            border: base.border.fg(Color::Indexed(145)),
            notice: base.notice.fg(Color::Indexed(25)),
            ..base
        }
    }

    fn set_color(&mut self, name: &str, spec: &str) {
        let mut spec_parts = spec.split(['+', ':']);

        let raw_color = spec_parts.next().unwrap_or_default();
        let new_color = if raw_color.len() == 7 && raw_color.starts_with('#') {
            let channel = |range| u8::from_str_radix(&raw_color[range], 16).unwrap_or(255);
            Some(Color::Rgb(channel(1..3), channel(3..5), channel(5..7)))
        } else {
            raw_color.parse::<u8>().ok().map(Color::Indexed).or_else(|| {
                debug!("Unknown color '{raw_color}'");
                None
            })
        };

        let mut modifier = Modifier::empty();
        for part in spec_parts {
            modifier |= match part {
                "b" | "bold" => Modifier::BOLD,
                "u" | "underlined" => Modifier::UNDERLINED,
                "d" | "dim" => Modifier::DIM,
                "i" | "italic" => Modifier::ITALIC,
                "r" | "reverse" => Modifier::REVERSED,
                m => {
                    debug!("Unknown modifier '{m}'");
                    Modifier::empty()
                }
            };
        }

        let (component, bg) = match name.strip_suffix("_bg").or_else(|| name.strip_suffix("-bg")) {
            Some(component) => (component, true),
            None => (name, false),
        };
        let style = match component {
            "" | "normal" => &mut self.normal,
            "matched" | "hl" => &mut self.matched,
            "current" | "fg+" => &mut self.current,
            "current_match" | "hl+" => &mut self.current_match,
            "query" => &mut self.query,
            "placeholder" => &mut self.placeholder,
            "spinner" => &mut self.spinner,
            "info" => &mut self.info,
            "prompt" => &mut self.prompt,
            "cursor" | "pointer" => &mut self.cursor,
            "image" => &mut self.image,
            "border" => &mut self.border,
            "notice" => &mut self.notice,
            c => {
                debug!("Unknown theme component '{c}'");
                return;
            }
        };
        if let Some(c) = new_color {
            *style = if bg { style.bg(c) } else { style.fg(c) };
        }
        *style = style.add_modifier(modifier);
    }

    /// Builds a theme from a `--color` value
    ///
    /// The value is a comma separated list of base theme names (`dark`, `light`,
    /// `16`, `bw`, `none`) and `component:color[:modifier...]` overrides, applied
    /// in order.
    pub fn from_options(color: &str) -> Self {
        let mut theme = ColorTheme::dark256();
        for pair in color.split(',') {
            if let Some((name, spec)) = pair.split_once(':') {
                theme.set_color(name, spec);
            } else {
                theme = match pair {
                    "light" => ColorTheme::light256(),
                    "16" => ColorTheme::default16(),
                    "bw" => ColorTheme::bw(),
                    "none" | "empty" => ColorTheme::none(),
                    "dark" | "default" => ColorTheme::dark256(),
                    t => {
                        debug!("Unknown color theme '{t}'");
                        ColorTheme::dark256()
                    }
                };
            }
        }
        theme
    }
}
