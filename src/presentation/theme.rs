use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub section: fn(&str) -> String,
    pub pron: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub para: fn(&str) -> String,
    pub sub: fn(&str) -> String,
    pub tag: fn(&str) -> String,
    pub error: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "temp" | "" => Self::temp(),
            "wudao" => Self::wudao(),
            "canvas" => Self::canvas(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::temp() // Fallback to default
            }
        }
    }

    fn temp() -> Self {
        Self {
            title: |s| s.bright_magenta().italic().bold().underline().to_string(),
            section: |s| s.cyan().bold().to_string(),
            pron: |s| s.normal().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            para: |s| s.white().to_string(),
            sub: |s| s.bright_white().dimmed().italic().to_string(),
            tag: |s| s.cyan().italic().to_string(),
            error: |s| s.red().to_string(),
        }
    }

    fn wudao() -> Self {
        Self {
            title: |s| s.red().italic().bold().underline().to_string(),
            section: |s| s.green().bold().to_string(),
            pron: |s| s.cyan().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            para: |s| s.white().to_string(),
            sub: |s| s.bright_yellow().dimmed().italic().to_string(),
            tag: |s| s.green().italic().to_string(),
            error: |s| s.red().to_string(),
        }
    }

    fn canvas() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            section: |s| s.bright_cyan().bold().to_string(),
            pron: |s| s.magenta().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            para: |s| s.black().to_string(),
            sub: |s| s.bright_black().italic().to_string(),
            tag: |s| s.green().italic().to_string(),
            error: |s| s.red().bold().to_string(),
        }
    }
}
