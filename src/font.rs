//! Font descriptors. We take fontconfig-style patterns like
//! `IBM 3270:size=24:style=Bold` or `Fira Mono-18:bold`, and anything
//! else is treated as a pango description string.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    Points(f64),
    Pixels(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weight {
    Thin,
    Ultralight,
    Light,
    Book,
    Normal,
    Medium,
    Semibold,
    Bold,
    Ultrabold,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slant {
    Roman,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub family: String,
    pub size: Option<FontSize>,
    pub weight: Option<Weight>,
    pub slant: Option<Slant>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FontSpec {
    Pattern(Pattern),
    /// handed to pango untouched
    Pango(String),
}

fn weight_from_name(name: &str) -> Option<Weight> {
    let w = match name.to_ascii_lowercase().as_str() {
        "thin" => Weight::Thin,
        "extralight" | "ultralight" => Weight::Ultralight,
        "light" => Weight::Light,
        "book" => Weight::Book,
        "regular" | "normal" => Weight::Normal,
        "medium" => Weight::Medium,
        "semibold" | "demibold" => Weight::Semibold,
        "bold" => Weight::Bold,
        "extrabold" | "ultrabold" => Weight::Ultrabold,
        "black" | "heavy" => Weight::Heavy,
        _ => return None,
    };
    Some(w)
}

fn slant_from_name(name: &str) -> Option<Slant> {
    match name.to_ascii_lowercase().as_str() {
        "roman" => Some(Slant::Roman),
        "italic" => Some(Slant::Italic),
        "oblique" => Some(Slant::Oblique),
        _ => None,
    }
}

fn parse_size(value: &str, descriptor: &str) -> Result<f64, failure::Error> {
    match value.trim().parse::<f64>() {
        Ok(sz) if sz.is_finite() && sz > 0.0 => Ok(sz),
        _ => bail!("Invalid font size `{}` in `{}`", value, descriptor),
    }
}

impl Pattern {
    fn apply_style_word(&mut self, word: &str) {
        if let Some(w) = weight_from_name(word) {
            self.weight = Some(w);
        } else if let Some(s) = slant_from_name(word) {
            self.slant = Some(s);
        } else {
            debug!("ignoring font style `{}`", word);
        }
    }
}

impl FontSpec {
    pub fn parse(descriptor: &str) -> Result<FontSpec, failure::Error> {
        let mut parts = descriptor.split(':');
        let head = parts.next().unwrap_or("").trim();

        // `Family-12` carries its size on the family name
        let (family, size) = match head.rfind('-') {
            Some(i) if head[i + 1..].trim().parse::<f64>().is_ok() => (
                head[..i].trim(),
                Some(FontSize::Points(parse_size(&head[i + 1..], descriptor)?)),
            ),
            _ => (head, None),
        };

        if family.is_empty() {
            bail!("Font `{}` names no family", descriptor);
        }
        if size.is_none() && !descriptor.contains(':') {
            return Ok(FontSpec::Pango(head.to_string()));
        }

        let mut pattern = Pattern {
            family: family.to_string(),
            size,
            weight: None,
            slant: None,
        };
        for prop in parts {
            let prop = prop.trim();
            if prop.is_empty() {
                continue;
            }
            let (key, value) = match prop.find('=') {
                Some(i) => (prop[..i].trim(), prop[i + 1..].trim()),
                None => (prop, ""),
            };
            match key.to_ascii_lowercase().as_str() {
                "size" => pattern.size = Some(FontSize::Points(parse_size(value, descriptor)?)),
                "pixelsize" => pattern.size = Some(FontSize::Pixels(parse_size(value, descriptor)?)),
                "style" => {
                    for word in value.split_whitespace() {
                        pattern.apply_style_word(word);
                    }
                }
                "weight" => match weight_from_name(value) {
                    Some(w) => pattern.weight = Some(w),
                    None => debug!("ignoring font weight `{}`", value),
                },
                "slant" => match slant_from_name(value) {
                    Some(s) => pattern.slant = Some(s),
                    None => debug!("ignoring font slant `{}`", value),
                },
                // bare constants like `:bold`
                _ if value.is_empty() => pattern.apply_style_word(key),
                other => debug!("ignoring font property `{}`", other),
            }
        }
        Ok(FontSpec::Pattern(pattern))
    }

    pub fn description(&self) -> pango::FontDescription {
        match self {
            FontSpec::Pango(s) => pango::FontDescription::from_string(s),
            FontSpec::Pattern(p) => {
                let mut desc = pango::FontDescription::new();
                desc.set_family(&p.family);
                match p.size {
                    Some(FontSize::Points(pt)) => desc.set_size((pt * pango::SCALE as f64) as i32),
                    Some(FontSize::Pixels(px)) => desc.set_absolute_size(px * pango::SCALE as f64),
                    None => (),
                }
                if let Some(w) = p.weight {
                    desc.set_weight(match w {
                        Weight::Thin => pango::Weight::Thin,
                        Weight::Ultralight => pango::Weight::Ultralight,
                        Weight::Light => pango::Weight::Light,
                        Weight::Book => pango::Weight::Book,
                        Weight::Normal => pango::Weight::Normal,
                        Weight::Medium => pango::Weight::Medium,
                        Weight::Semibold => pango::Weight::Semibold,
                        Weight::Bold => pango::Weight::Bold,
                        Weight::Ultrabold => pango::Weight::Ultrabold,
                        Weight::Heavy => pango::Weight::Heavy,
                    });
                }
                if let Some(s) = p.slant {
                    desc.set_style(match s {
                        Slant::Roman => pango::Style::Normal,
                        Slant::Italic => pango::Style::Italic,
                        Slant::Oblique => pango::Style::Oblique,
                    });
                }
                desc
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(descriptor: &str) -> Pattern {
        match FontSpec::parse(descriptor).unwrap() {
            FontSpec::Pattern(p) => p,
            other => panic!("expected a pattern, got {:?}", other),
        }
    }

    #[test]
    fn default_font() {
        let p = pattern("IBM 3270:size=24:style=Bold");
        assert_eq!(p.family, "IBM 3270");
        assert_eq!(p.size, Some(FontSize::Points(24.0)));
        assert_eq!(p.weight, Some(Weight::Bold));
        assert_eq!(p.slant, None);
    }

    #[test]
    fn size_suffix_on_family() {
        let p = pattern("DejaVu Sans Mono-18:italic");
        assert_eq!(p.family, "DejaVu Sans Mono");
        assert_eq!(p.size, Some(FontSize::Points(18.0)));
        assert_eq!(p.slant, Some(Slant::Italic));
    }

    #[test]
    fn hyphenated_family_is_not_a_size() {
        assert_eq!(
            FontSpec::parse("Noto Sans-Bold").unwrap(),
            FontSpec::Pango("Noto Sans-Bold".to_string())
        );
    }

    #[test]
    fn style_words_and_pixel_size() {
        let p = pattern("Terminus:pixelsize=32:style=Semibold Oblique");
        assert_eq!(p.size, Some(FontSize::Pixels(32.0)));
        assert_eq!(p.weight, Some(Weight::Semibold));
        assert_eq!(p.slant, Some(Slant::Oblique));
    }

    #[test]
    fn unknown_properties_are_ignored() {
        let p = pattern("Fira Mono:antialias=true:style=Condensed Bold:hinting");
        assert_eq!(p.family, "Fira Mono");
        assert_eq!(p.weight, Some(Weight::Bold));
        assert_eq!(p.size, None);
    }

    #[test]
    fn plain_strings_go_to_pango() {
        assert_eq!(
            FontSpec::parse("Fira Mono Bold 18").unwrap(),
            FontSpec::Pango("Fira Mono Bold 18".to_string())
        );
    }

    #[test]
    fn bad_sizes_are_rejected() {
        assert!(FontSpec::parse("Fira Mono:size=huge").is_err());
        assert!(FontSpec::parse("Fira Mono:size=0").is_err());
        assert!(FontSpec::parse("Fira Mono:pixelsize=-3").is_err());
    }

    #[test]
    fn missing_family_is_rejected() {
        assert!(FontSpec::parse("").is_err());
        assert!(FontSpec::parse(":size=12").is_err());
        assert!(FontSpec::parse("-12").is_err());
    }
}
