/// Colors written into the package theme part and the text runs.
/// Hex srgb without the leading '#'.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub accent: &'static str,
    pub heading: &'static str,
    pub body: &'static str,
}

pub const DEFAULT_THEME: Theme = Theme {
    name: "default",
    accent: "4472C4",
    heading: "1F3864",
    body: "404040",
};

/// Immutable registry of the named themes the request may select,
/// built once at startup.
pub struct ThemeRegistry {
    themes: Vec<Theme>,
}

impl ThemeRegistry {
    pub fn builtin() -> Self {
        ThemeRegistry {
            themes: vec![
                DEFAULT_THEME,
                Theme { name: "midnight", accent: "1A73E8", heading: "0B1F3A", body: "3C4043" },
                Theme { name: "forest", accent: "2E7D32", heading: "1B5E20", body: "37474F" },
            ],
        }
    }

    /// Unknown or absent names fall back to the default theme.
    pub fn resolve(&self, name: Option<&str>) -> Theme {
        name.and_then(|name| {
            self.themes
                .iter()
                .find(|theme| theme.name.eq_ignore_ascii_case(name))
                .copied()
        })
        .unwrap_or(DEFAULT_THEME)
    }
}
