//! Front-matter splitting and metadata extraction.
//!
//! A note may open with a YAML block fenced by `---` lines (three or more
//! dashes) or a TOML block fenced by `+++` lines. Only `title` and `tags`
//! are read; every other key is ignored.

use serde::Deserialize;

/// Format of a front-matter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    Yaml,
    Toml,
}

impl FrontMatterFormat {
    fn from_opening_line(line: &str) -> Option<Self> {
        if Self::Yaml.is_delimiter(line) {
            Some(Self::Yaml)
        } else if Self::Toml.is_delimiter(line) {
            Some(Self::Toml)
        } else {
            None
        }
    }

    fn is_delimiter(self, line: &str) -> bool {
        let line = line.trim_end();
        match self {
            Self::Yaml => line.len() >= 3 && line.chars().all(|c| c == '-'),
            Self::Toml => line == "+++",
        }
    }
}

/// A note split into its raw front-matter block and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitNote<'a> {
    /// Front matter, if the note has a complete fenced block.
    pub front_matter: Option<(FrontMatterFormat, &'a str)>,

    /// Body text, trimmed.
    pub body: &'a str,
}

/// Split `text` into front matter and body.
///
/// The text is trimmed (and a byte-order mark dropped) first. An opening
/// fence with no closing fence means there is no front matter and the whole
/// text is the body.
pub fn split(text: &str) -> SplitNote<'_> {
    let text = text.trim_start_matches('\u{feff}').trim();

    let mut lines = text.split_inclusive('\n');
    let Some(format) = lines.next().and_then(FrontMatterFormat::from_opening_line) else {
        return SplitNote {
            front_matter: None,
            body: text,
        };
    };

    let block_start = text.find('\n').map_or(text.len(), |i| i + 1);
    let mut offset = block_start;
    for line in lines {
        if format.is_delimiter(line) {
            return SplitNote {
                front_matter: Some((format, &text[block_start..offset])),
                body: text[offset + line.len()..].trim(),
            };
        }
        offset += line.len();
    }

    SplitNote {
        front_matter: None,
        body: text,
    }
}

/// Metadata read from front matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Str(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Tags {
    Many(Vec<Scalar>),
    One(Scalar),
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    title: Option<Scalar>,
    #[serde(default)]
    tags: Option<Tags>,
}

impl From<RawMetadata> for Metadata {
    fn from(raw: RawMetadata) -> Self {
        let tags = match raw.tags {
            None => Vec::new(),
            Some(Tags::One(tag)) => vec![tag.into_string()],
            Some(Tags::Many(tags)) => tags.into_iter().map(Scalar::into_string).collect(),
        };
        Self {
            title: raw.title.map(Scalar::into_string),
            tags,
        }
    }
}

/// Parse a front-matter block into metadata.
///
/// A block that is not a mapping (empty, a list, a scalar) yields default
/// metadata. Syntax errors and wrongly-typed `title`/`tags` are errors.
pub fn parse_metadata(format: FrontMatterFormat, block: &str) -> Result<Metadata, String> {
    let raw = match format {
        FrontMatterFormat::Yaml => {
            let value: serde_yaml::Value =
                serde_yaml::from_str(block).map_err(|e| e.to_string())?;
            let serde_yaml::Value::Mapping(mapping) = value else {
                return Ok(Metadata::default());
            };
            // Keys may be any YAML value; only the two string keys matter.
            let field = |name: &str| {
                mapping
                    .get(name)
                    .cloned()
                    .unwrap_or(serde_yaml::Value::Null)
            };
            RawMetadata {
                title: serde_yaml::from_value(field("title")).map_err(|e| e.to_string())?,
                tags: serde_yaml::from_value(field("tags")).map_err(|e| e.to_string())?,
            }
        }
        // A TOML document is always a table.
        FrontMatterFormat::Toml => {
            toml::from_str::<RawMetadata>(block).map_err(|e| e.to_string())?
        }
    };
    Ok(raw.into())
}
