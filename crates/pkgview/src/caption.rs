//! Caption decoration for display items.
//!
//! The sync layer decides *whether* part of a caption carries a mark
//! ([`CaptionMark`]); the view decides *how* a mark renders through a
//! [`CaptionStyler`]. Captions are assembled from templates with
//! [`fmt_safe`], which never fails: a template that does not match its
//! arguments is used raw.

use std::fmt;

use pkgview_core::logging::targets;

use crate::model::{PackageInfo, PackageModel, ReleaseInfo};
use crate::settings::CaptionTemplates;
use crate::view::{PackageView, ViewState};

/// What a decorated caption fragment means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionMark {
    /// The item is already installed or already part of the project.
    AlreadyAdded,
    /// A version suffix.
    Version,
}

/// Renders marked caption fragments.
pub trait CaptionStyler: Send + Sync {
    fn decorate(&self, text: &str, mark: CaptionMark) -> String;
}

/// Leaves every fragment undecorated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyler;

impl CaptionStyler for PlainStyler {
    fn decorate(&self, text: &str, _mark: CaptionMark) -> String {
        text.to_string()
    }
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create an opaque color from 8-bit RGB components.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from 8-bit RGBA components.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a hex string (e.g., "#FF0000" or "#FF0000FF").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let len = hex.len();

        if (len != 6 && len != 8) || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        let a = if len == 8 {
            u8::from_str_radix(&hex[6..8], 16).ok()?
        } else {
            255
        };

        Some(Self::from_rgba8(r, g, b, a))
    }

    /// Format as `#RRGGBBAA`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Colors used by [`RichTextStyler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub already_added_color: Color,
    pub version_color: Color,
}

impl Theme {
    pub const DEFAULT_ALREADY_ADDED: Color = Color::from_rgb8(0x5C, 0xA0, 0x5C);
    pub const DEFAULT_VERSION: Color = Color::from_rgb8(0x8C, 0x8C, 0x8C);

    pub fn color_for(&self, mark: CaptionMark) -> Color {
        match mark {
            CaptionMark::AlreadyAdded => self.already_added_color,
            CaptionMark::Version => self.version_color,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            already_added_color: Self::DEFAULT_ALREADY_ADDED,
            version_color: Self::DEFAULT_VERSION,
        }
    }
}

/// Wraps marked fragments in `<color=#RRGGBBAA>...</color>` rich-text tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichTextStyler {
    theme: Theme,
}

impl RichTextStyler {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

impl CaptionStyler for RichTextStyler {
    fn decorate(&self, text: &str, mark: CaptionMark) -> String {
        format!("<color={}>{}</color>", self.theme.color_for(mark), text)
    }
}

/// Substitute positional `{N}` placeholders in `template`.
///
/// `{{` and `}}` produce literal braces. Arguments without a placeholder are
/// ignored. If the template references a missing argument or has unbalanced
/// braces, it is returned unchanged.
pub fn fmt_safe(template: &str, args: &[&str]) -> String {
    match try_format(template, args) {
        Some(formatted) => formatted,
        None => {
            tracing::warn!(
                target: targets::CAPTION,
                template,
                arg_count = args.len(),
                "caption template does not match its arguments, using it unformatted"
            );
            template.to_string()
        }
    }
}

fn try_format(template: &str, args: &[&str]) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut index = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        d if d.is_ascii_digit() => index.push(d),
                        _ => return None,
                    }
                }
                let index: usize = index.parse().ok()?;
                out.push_str(args.get(index)?);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return None,
            c => out.push(c),
        }
    }

    Some(out)
}

/// Builds captions for the three kinds of rows.
pub(crate) struct CaptionBuilder<'a> {
    pub model: &'a dyn PackageModel,
    pub view: &'a dyn PackageView,
    pub templates: &'a CaptionTemplates,
}

impl CaptionBuilder<'_> {
    /// Plugin and asset rows: marked while the packages panel sits next to
    /// the project.
    ///
    /// The view mode can be mid-transition when this runs, so it is only used
    /// to pick the decoration.
    pub fn project_item(&self, name: &str) -> String {
        if self.view.view_state() == ViewState::PackagesAndProject {
            self.view.decorate(name, CaptionMark::AlreadyAdded)
        } else {
            name.to_string()
        }
    }

    pub fn release(&self, info: &ReleaseInfo) -> String {
        let caption = if self.model.is_release_installed(info) {
            self.view.decorate(&info.name, CaptionMark::AlreadyAdded)
        } else {
            info.name.clone()
        };

        match info.display_version() {
            Some(version) => {
                let version = self
                    .view
                    .decorate(&format!("v{version}"), CaptionMark::Version);
                fmt_safe(&self.templates.release_with_version, &[caption.as_str(), version.as_str()])
            }
            None => caption,
        }
    }

    pub fn package(&self, info: &PackageInfo) -> String {
        if self.view.view_state() == ViewState::ReleasesAndPackages {
            let Some(release) = info.source_release() else {
                return info.name.clone();
            };
            let release_name = self.view.decorate(&release.name, CaptionMark::AlreadyAdded);
            let version = release
                .display_version()
                .map(|v| self.view.decorate(&format!(" v{v}"), CaptionMark::Version))
                .unwrap_or_default();
            fmt_safe(
                &self.templates.package_with_release,
                &[info.name.as_str(), release_name.as_str(), version.as_str()],
            )
        } else if self.model.is_package_added_to_project(&info.name) {
            self.view.decorate(&info.name, CaptionMark::AlreadyAdded)
        } else {
            info.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_safe_positional() {
        assert_eq!(fmt_safe("{0} ({1}{2})", &["Bar", "Baz", " v2.0"]), "Bar (Baz v2.0)");
        assert_eq!(fmt_safe("{1}-{0}", &["a", "b"]), "b-a");
        assert_eq!(fmt_safe("no placeholders", &["unused"]), "no placeholders");
    }

    #[test]
    fn test_fmt_safe_escapes() {
        assert_eq!(fmt_safe("{{{0}}}", &["x"]), "{x}");
    }

    #[test]
    fn test_fmt_safe_mismatch_returns_raw() {
        assert_eq!(fmt_safe("{0} {3}", &["a", "b"]), "{0} {3}");
        assert_eq!(fmt_safe("{0", &["a"]), "{0");
        assert_eq!(fmt_safe("{name}", &["a"]), "{name}");
        assert_eq!(fmt_safe("a } b", &["a"]), "a } b");
        assert_eq!(fmt_safe("{}", &["a"]), "{}");
    }

    #[test]
    fn test_color_hex_round_trip() {
        let color = Color::from_hex("#5CA05C").unwrap();
        assert_eq!(color, Color::from_rgb8(0x5C, 0xA0, 0x5C));
        assert_eq!(color.to_hex(), "#5CA05CFF");
        assert_eq!(Color::from_hex("12345678"), Some(Color::from_rgba8(0x12, 0x34, 0x56, 0x78)));
        assert_eq!(Color::from_hex("#zzzzzz"), None);
        assert_eq!(Color::from_hex("#123"), None);
    }

    #[test]
    fn test_rich_text_styler_wraps_with_theme_color() {
        let styler = RichTextStyler::new(Theme {
            already_added_color: Color::from_rgb8(0, 255, 0),
            version_color: Color::from_rgb8(128, 128, 128),
        });

        assert_eq!(
            styler.decorate("Foo", CaptionMark::AlreadyAdded),
            "<color=#00FF00FF>Foo</color>"
        );
        assert_eq!(
            styler.decorate("v1.2", CaptionMark::Version),
            "<color=#808080FF>v1.2</color>"
        );
    }

    #[test]
    fn test_plain_styler_is_identity() {
        assert_eq!(PlainStyler.decorate("Foo", CaptionMark::Version), "Foo");
    }
}
