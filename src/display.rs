use crate::{
    app::App,
    clock::{self, Period},
    input::Mode,
    state::Theme,
    surface::Surface,
    util::Color,
};
use chrono::{DateTime, Utc};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue, style,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use itertools::Itertools;
use log::{info, trace};
use serde::Deserialize;
use std::{io::Write, mem};

/// Colors for one theme
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Palette {
    pub const LIGHT: Self = Self {
        foreground: Color::rgb(0x1f, 0x29, 0x33),
        background: Color::rgb(0xf5, 0xf7, 0xfa),
        accent: Color::rgb(0x25, 0x63, 0xeb),
        muted: Color::rgb(0x7b, 0x87, 0x94),
    };
    pub const DARK: Self = Self {
        foreground: Color::rgb(0xe4, 0xe7, 0xeb),
        background: Color::rgb(0x1a, 0x1d, 0x23),
        accent: Color::rgb(0xf5, 0x9e, 0x0b),
        muted: Color::rgb(0x9a, 0xa5, 0xb1),
    };

    /// (foreground, background) for a line style
    fn colors(&self, style: Style) -> (Color, Color) {
        match style {
            Style::Normal => (self.foreground, self.background),
            Style::Heading | Style::Accent => (self.accent, self.background),
            Style::Muted => (self.muted, self.background),
            Style::Selected => (self.background, self.accent),
            Style::Notice => (self.background, self.foreground),
        }
    }
}

/// How a line should be painted. Actual colors come from the theme's
/// [Palette].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Style {
    Normal,
    Heading,
    Accent,
    Muted,
    Selected,
    Notice,
}

/// One row of dashboard text
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub text: String,
    pub style: Style,
}

/// Everything on the screen at one moment, top to bottom
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    theme: Theme,
    lines: Vec<Line>,
}

impl Frame {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn push(&mut self, text: impl Into<String>, style: Style) {
        self.lines.push(Line {
            text: text.into(),
            style,
        });
    }

    fn blank(&mut self) {
        self.push("", Style::Normal);
    }
}

/// Lay out the whole dashboard for the given instant
pub fn render(app: &App, now: DateTime<Utc>) -> Frame {
    let settings = app.settings();
    let selection = app.selection();
    let mut frame = Frame::new(settings.theme);

    frame.push(
        format!(
            "World Clock   {}   {}",
            settings.time_format.label(),
            settings.theme.icon()
        ),
        Style::Heading,
    );
    frame.blank();

    // Primary city gets the big clock, with seconds
    let primary = selection.primary();
    frame.push(primary.to_string(), Style::Heading);
    frame.push(
        clock::format_time(primary.timezone, now, settings.time_format, true),
        Style::Accent,
    );
    frame.push(clock::format_date(now), Style::Muted);
    frame.blank();

    for (index, city) in selection.iter().enumerate() {
        // Primary can't be removed, so it gets a star instead of an X
        let marker = if index == selection.primary_index() {
            '★'
        } else {
            '×'
        };
        let period = Period::at(city.timezone, now);
        let text = format!(
            "{marker} {:<14}{:<10}{:<10}{} {}",
            city.name,
            clock::utc_offset(city.timezone, now),
            clock::format_time(
                city.timezone,
                now,
                settings.time_format,
                false
            ),
            period.icon(),
            period,
        );
        let style = if app.mode() == Mode::Browse && index == app.cursor() {
            Style::Selected
        } else {
            Style::Normal
        };
        frame.push(text, style);
    }

    if let Some(search) = app.search() {
        frame.blank();
        frame.push(format!("Search: {}_", search.query()), Style::Normal);
        for (index, city) in search.results().iter().enumerate() {
            let style = if index == search.highlighted() {
                Style::Selected
            } else {
                Style::Normal
            };
            frame.push(format!("  {city}"), style);
        }
        if search.results().is_empty() && search.query().chars().count() >= 2
        {
            frame.push("  No matching cities", Style::Muted);
        }
    }

    if let Some(notice) = app.notice() {
        frame.blank();
        frame.push(format!(" {notice} "), Style::Notice);
    }

    frame.blank();
    frame.push(help(app.mode()), Style::Muted);
    frame
}

/// Key hints for the footer
fn help(mode: Mode) -> String {
    let keys: &[(&str, &str)] = match mode {
        Mode::Browse => &[
            ("↑↓/jk", "move"),
            ("x", "remove"),
            ("p", "make primary"),
            ("a or /", "add city"),
            ("1/2", "12h/24h"),
            ("f", "switch format"),
            ("t", "theme"),
            ("q", "quit"),
        ],
        Mode::Search => &[
            ("type", "search"),
            ("↑↓", "pick"),
            ("enter", "add"),
            ("esc", "close"),
        ],
        Mode::Notice => &[("any key", "dismiss")],
    };
    keys.iter()
        .map(|(key, description)| format!("{key} {description}"))
        .join("  ")
}

/// Terminal surface. Keeps a copy of what's on screen and only rewrites rows
/// that changed, so the once-a-second tick doesn't flicker.
pub struct Display<W: Write> {
    out: W,
    light: Palette,
    dark: Palette,
    /// The frame currently on the screen
    shown: Frame,
    /// Set when the next draw has to repaint everything
    dirty: bool,
}

impl<W: Write> Display<W> {
    pub fn new(out: W, light: Palette, dark: Palette) -> Self {
        Self {
            out,
            light,
            dark,
            shown: Frame::default(),
            dirty: true,
        }
    }

    fn palette(&self, theme: Theme) -> Palette {
        match theme {
            Theme::Light => self.light,
            Theme::Dark => self.dark,
        }
    }

    /// Write the changed parts of a frame. If nothing changed, do nothing.
    /// Return whether or not anything was written.
    fn draw(&mut self, frame: &Frame) -> anyhow::Result<bool> {
        if !self.dirty && *frame == self.shown {
            return Ok(false);
        }

        // A theme change recolors every row
        let repaint = self.dirty || frame.theme != self.shown.theme;
        let palette = self.palette(frame.theme);
        let background = style::Color::from(palette.background);
        if repaint {
            trace!("Repainting screen");
            queue!(
                self.out,
                SetBackgroundColor(background),
                Clear(ClearType::All)
            )?;
        }

        let previous = mem::take(&mut self.shown.lines);
        for (y, line) in frame.lines.iter().enumerate() {
            if !repaint && previous.get(y) == Some(line) {
                continue;
            }
            trace!("Writing row {y}: {:?}", line.text);
            let (foreground, line_background) = palette.colors(line.style);
            queue!(
                self.out,
                MoveTo(0, y as u16),
                SetForegroundColor(foreground.into()),
                SetBackgroundColor(line_background.into()),
                Print(&line.text),
                SetBackgroundColor(background),
                Clear(ClearType::UntilNewLine),
            )?;
        }

        // Wipe anything left over from a longer frame
        if frame.lines.len() < previous.len() {
            queue!(
                self.out,
                MoveTo(0, frame.lines.len() as u16),
                SetBackgroundColor(background),
                Clear(ClearType::FromCursorDown),
            )?;
        }

        self.out.flush()?;
        self.shown = frame.clone();
        self.dirty = false;
        Ok(true)
    }
}

impl<W: Write> Surface for Display<W> {
    fn name(&self) -> &str {
        "terminal"
    }

    fn on_start(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        queue!(self.out, EnterAlternateScreen, Hide)?;
        self.out.flush()?;
        self.dirty = true;
        Ok(())
    }

    fn on_tick(&mut self, frame: &Frame) -> anyhow::Result<()> {
        if self.draw(frame)? {
            trace!("Frame updated");
        }
        Ok(())
    }

    fn on_stop(&mut self) -> anyhow::Result<()> {
        queue!(self.out, ResetColor, Show, LeaveAlternateScreen)?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        info!("Terminal restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        city,
        config::Config,
        input::Action,
        state::{Selection, Settings},
    };

    fn instant(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn app() -> App {
        let config = Config::default();
        App::new(config.selection().unwrap(), Settings::default())
    }

    fn texts(frame: &Frame) -> Vec<&str> {
        frame.lines().iter().map(|line| line.text.as_str()).collect()
    }

    fn frame(lines: &[&str]) -> Frame {
        let mut frame = Frame::new(Theme::Light);
        for line in lines {
            frame.push(*line, Style::Normal);
        }
        frame
    }

    fn written(display: &mut Display<Vec<u8>>) -> String {
        String::from_utf8(mem::take(&mut display.out)).unwrap()
    }

    #[test]
    fn test_render() {
        let frame = render(&app(), instant("2024-01-15T12:00:00Z"));
        let lines = texts(&frame);
        assert_eq!(lines[0], "World Clock   12h   🌙");
        assert_eq!(lines[2], "Mogadishu, Somalia");
        assert_eq!(lines[3], "03:00:00 PM");
        assert_eq!(
            lines[6],
            "★ Mogadishu     UTC+3     03:00 PM  ☀️ Day"
        );
        let cards = [
            "× Los Angeles   UTC-8     04:00 AM  🌙 Night",
            "× New York      UTC-5     07:00 AM  🌅 Morning",
            "× London        UTC       12:00 PM  ☀️ Day",
            "× Tokyo         UTC+9     09:00 PM  🌆 Evening",
        ];
        assert_eq!(lines[7..11], cards);
        // Cursor starts on the first card
        assert_eq!(frame.lines()[6].style, Style::Selected);
        assert_eq!(frame.lines()[7].style, Style::Normal);
        assert!(lines.last().unwrap().contains("q quit"));
    }

    #[test]
    fn test_help_lists_bindings() {
        let browse = help(Mode::Browse);
        for hint in ["jk", "a or /", "f switch format", "1/2", "t theme"] {
            assert!(browse.contains(hint), "missing {hint:?} in {browse:?}");
        }
        assert_eq!(help(Mode::Notice), "any key dismiss");
    }

    #[test]
    fn test_render_settings() {
        let mut app = app();
        app.apply(Action::SetTimeFormat(clock::TimeFormat::TwentyFourHour));
        app.apply(Action::ToggleTheme);
        let frame = render(&app, instant("2024-01-15T12:00:00Z"));
        let lines = texts(&frame);
        assert_eq!(frame.theme(), Theme::Dark);
        assert_eq!(lines[0], "World Clock   24h   ☀️");
        assert_eq!(lines[3], "15:00:00");
        assert!(lines[10].starts_with("× Tokyo"));
        assert!(lines[10].contains("21:00"));
    }

    #[test]
    fn test_render_primary_moves() {
        let selection = Selection::new(
            [
                *city::find("Europe/London").unwrap(),
                *city::find("Asia/Kolkata").unwrap(),
            ],
            1,
        )
        .unwrap();
        let app = App::new(selection, Settings::default());
        let frame = render(&app, instant("2024-07-15T12:00:00Z"));
        let lines = texts(&frame);
        assert_eq!(lines[2], "Mumbai, India");
        assert_eq!(lines[3], "05:30:00 PM");
        assert!(lines[6].starts_with("× London        UTC+1"));
        assert!(lines[7].starts_with("★ Mumbai        UTC+5:30"));
    }

    #[test]
    fn test_render_search() {
        let mut app = app();
        app.apply(Action::OpenSearch);
        app.apply(Action::Type('l'));
        app.apply(Action::Type('o'));
        let frame = render(&app, instant("2024-01-15T12:00:00Z"));
        let lines = texts(&frame);
        let search = lines.iter().position(|line| *line == "Search: lo_");
        let search = search.unwrap();
        assert_eq!(lines[search + 1], "  Los Angeles, USA");
        assert_eq!(lines[search + 2], "  London, UK");
        assert_eq!(lines[search + 3], "  São Paulo, Brazil");
        assert_eq!(frame.lines()[search + 1].style, Style::Selected);
        // No card is highlighted while searching
        assert!(frame.lines()[..search]
            .iter()
            .all(|line| line.style != Style::Selected));

        app.apply(Action::Type('x'));
        let frame = render(&app, instant("2024-01-15T12:00:00Z"));
        assert!(texts(&frame).contains(&"  No matching cities"));
    }

    #[test]
    fn test_render_notice() {
        let mut app = app();
        app.apply(Action::RemoveAtCursor);
        let frame = render(&app, instant("2024-01-15T12:00:00Z"));
        let notice = frame
            .lines()
            .iter()
            .find(|line| line.style == Style::Notice)
            .unwrap();
        assert_eq!(notice.text, " Cannot remove your primary city! ");
        assert_eq!(
            frame.lines().last().unwrap().text,
            "any key dismiss"
        );
    }

    #[test]
    fn test_draw_diff() {
        let mut display =
            Display::new(Vec::new(), Palette::LIGHT, Palette::DARK);
        assert!(display.draw(&frame(&["alpha", "bravo"])).unwrap());
        let output = written(&mut display);
        assert!(output.contains("alpha"));
        assert!(output.contains("bravo"));

        // Same frame, nothing to do
        assert!(!display.draw(&frame(&["alpha", "bravo"])).unwrap());
        assert!(display.out.is_empty());

        // Only the changed row is rewritten
        assert!(display.draw(&frame(&["alpha", "charlie"])).unwrap());
        let output = written(&mut display);
        assert!(!output.contains("alpha"));
        assert!(output.contains("charlie"));
    }

    #[test]
    fn test_draw_theme_change() {
        let mut display =
            Display::new(Vec::new(), Palette::LIGHT, Palette::DARK);
        display.draw(&frame(&["alpha", "bravo"])).unwrap();
        written(&mut display);

        let mut dark = frame(&["alpha", "bravo"]);
        dark.theme = Theme::Dark;
        assert!(display.draw(&dark).unwrap());
        let output = written(&mut display);
        assert!(output.contains("alpha"));
        assert!(output.contains("bravo"));
    }

    #[test]
    fn test_palette_colors() {
        let palette = Palette::LIGHT;
        assert_eq!(
            palette.colors(Style::Selected),
            (palette.background, palette.accent)
        );
        assert_eq!(
            palette.colors(Style::Muted),
            (palette.muted, palette.background)
        );
    }
}
