//! Light/dark presentation flag.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
}

pub const LIGHT: Palette = Palette {
    background: "#ffffff",
    foreground: "#000000",
};

pub const DARK: Palette = Palette {
    background: "#333333",
    foreground: "#ffffff",
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub dark: bool,
}

impl ThemeState {
    pub fn palette(&self) -> Palette {
        if self.dark {
            DARK
        } else {
            LIGHT
        }
    }

    /// Label of the control that switches to the other mode.
    pub fn toggle_label(&self) -> &'static str {
        if self.dark {
            "Light Mode"
        } else {
            "Dark Mode"
        }
    }

    pub fn toggle(&mut self) -> Palette {
        self.dark = !self.dark;
        self.palette()
    }
}
