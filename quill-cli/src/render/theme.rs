use termimad::{
    Alignment, MadSkin,
    crossterm::style::{Attribute, Color},
};

/// One Dark colors used by the terminal renderer.
pub struct OneDark;

impl OneDark {
    pub const BG: Color = Color::Rgb {
        r: 0x28,
        g: 0x2C,
        b: 0x34,
    };
    pub const FG: Color = Color::Rgb {
        r: 0xAB,
        g: 0xB2,
        b: 0xBF,
    };
    pub const RED: Color = Color::Rgb {
        r: 0xE0,
        g: 0x6C,
        b: 0x75,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 0xD1,
        g: 0x9A,
        b: 0x66,
    };
    pub const YELLOW: Color = Color::Rgb {
        r: 0xE5,
        g: 0xC0,
        b: 0x7B,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0x98,
        g: 0xC3,
        b: 0x79,
    };
    pub const BLUE: Color = Color::Rgb {
        r: 0x61,
        g: 0xAF,
        b: 0xEF,
    };
    pub const CYAN: Color = Color::Rgb {
        r: 0x56,
        g: 0xB6,
        b: 0xC2,
    };
    pub const COMMENT: Color = Color::Rgb {
        r: 0x5C,
        g: 0x63,
        b: 0x70,
    };

    /// Skin for entry bodies: headings stand out, quotes and code are muted.
    pub fn journal_skin() -> MadSkin {
        let mut skin = MadSkin::default();

        skin.paragraph.set_fg(Self::FG);
        skin.bold.set_fg(Self::FG);
        skin.italic.set_fg(Self::FG);

        skin.headers[0].set_fg(Self::YELLOW);
        skin.headers[0].add_attr(Attribute::Bold);
        skin.headers[0].align = Alignment::Left;
        skin.headers[1].set_fg(Self::BLUE);
        skin.headers[1].add_attr(Attribute::Bold);
        skin.headers[2].set_fg(Self::CYAN);

        skin.bullet.set_fg(Self::RED);
        skin.quote_mark.set_char('┃');
        skin.quote_mark.set_fg(Self::COMMENT);
        skin.inline_code.set_fg(Self::GREEN);
        skin.inline_code.set_bg(Self::BG);
        skin.code_block.set_fg(Self::ORANGE);
        skin.code_block.set_bg(Self::BG);

        skin
    }
}
