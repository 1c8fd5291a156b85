//! Snapshot and embed links.
//!
//! ```text
//! snapshot: <base>?snapshot=1&language=<id>&value=<token>
//!           <base>app/snapshot?language=<id>&value=<token>
//! embed:    <base>app/embed?language=<id>&value=<token>[&readonly=1][&lineNumbers=1][&minimap=1][&stickyScroll=1]
//! ```

use anyhow::{Context, Result};
use url::Url;

use crate::codec;
use crate::document::{Document, PLAINTEXT};
use crate::prefs::DisplayFlags;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5173/";

const SNAPSHOT_PARAM: &str = "snapshot";
const LANGUAGE_PARAM: &str = "language";
const VALUE_PARAM: &str = "value";
const READ_ONLY_PARAM: &str = "readonly";
const LINE_NUMBERS_PARAM: &str = "lineNumbers";
const MINIMAP_PARAM: &str = "minimap";
const STICKY_SCROLL_PARAM: &str = "stickyScroll";

const EMBED_PATH: &str = "app/embed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Snapshot,
    Embed,
}

/// What a share link carries, before it is turned into a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinkPayload {
    pub language_id: String,
    pub encoded_content: String,
    pub read_only: Option<bool>,
    pub line_numbers: Option<bool>,
    pub minimap: Option<bool>,
    pub sticky_scroll: Option<bool>,
}

impl ShareLinkPayload {
    /// `None` when there is no content to share.
    pub fn snapshot(language_id: &str, content: &str) -> Option<Self> {
        if content.is_empty() {
            return None;
        }
        Some(Self {
            language_id: language_id.to_string(),
            encoded_content: codec::encode(content),
            read_only: None,
            line_numbers: None,
            minimap: None,
            sticky_scroll: None,
        })
    }

    pub fn embed(language_id: &str, content: &str, flags: DisplayFlags) -> Option<Self> {
        Self::snapshot(language_id, content).map(|payload| Self {
            read_only: Some(flags.read_only),
            line_numbers: Some(flags.line_numbers),
            minimap: Some(flags.minimap),
            sticky_scroll: Some(flags.sticky_scroll),
            ..payload
        })
    }

    fn append_to(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        query
            .append_pair(LANGUAGE_PARAM, &self.language_id)
            .append_pair(VALUE_PARAM, &self.encoded_content);
        let flags = [
            (READ_ONLY_PARAM, self.read_only),
            (LINE_NUMBERS_PARAM, self.line_numbers),
            (MINIMAP_PARAM, self.minimap),
            (STICKY_SCROLL_PARAM, self.sticky_scroll),
        ];
        for (name, value) in flags {
            if value == Some(true) {
                query.append_pair(name, "1");
            }
        }
    }
}

/// A share link opened by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingLink {
    pub mode: LinkMode,
    pub language_id: String,
    pub content: String,
    /// Display overrides; only embed links have them.
    pub flags: Option<DisplayFlags>,
}

#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: Url,
}

impl LinkBuilder {
    pub fn new(base: &str) -> Result<Self> {
        let mut base = Url::parse(base).with_context(|| format!("Invalid base URL: {}", base))?;
        if base.cannot_be_a_base() {
            return Err(anyhow::anyhow!("Base URL cannot carry paths: {}", base));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `None` when the document is empty.
    pub fn build_snapshot_link<H>(&self, document: &Document<H>) -> Option<Url> {
        let payload = ShareLinkPayload::snapshot(document.language_id(), document.content())?;
        let mut url = self.base.clone();
        url.query_pairs_mut().append_pair(SNAPSHOT_PARAM, "1");
        payload.append_to(&mut url);
        Some(url)
    }

    /// `None` when the document is empty.
    pub fn build_embed_link<H>(&self, document: &Document<H>, flags: DisplayFlags) -> Option<Url> {
        let payload =
            ShareLinkPayload::embed(document.language_id(), document.content(), flags)?;
        let mut url = self.base.join(EMBED_PATH).ok()?;
        payload.append_to(&mut url);
        Some(url)
    }
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("Invalid DEFAULT_BASE_URL"),
        }
    }
}

/// Recognise a snapshot or embed link. Anything else yields `None`.
pub fn parse_incoming_link(url: &Url) -> Option<IncomingLink> {
    let path = url.path().trim_end_matches('/');
    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    let mode = if path.ends_with("/embed") {
        LinkMode::Embed
    } else if path.ends_with("/snapshot") || param(SNAPSHOT_PARAM).is_some_and(|v| !v.is_empty())
    {
        LinkMode::Snapshot
    } else {
        return None;
    };

    let language_id = param(LANGUAGE_PARAM)
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| PLAINTEXT.to_string());
    let content = param(VALUE_PARAM)
        .map(|token| codec::decode_or_empty(&token))
        .unwrap_or_default();

    let flag = |name: &str| param(name).is_some_and(|v| v != "0" && v != "false");
    let flags = match mode {
        LinkMode::Embed => Some(DisplayFlags {
            read_only: flag(READ_ONLY_PARAM),
            line_numbers: flag(LINE_NUMBERS_PARAM),
            minimap: flag(MINIMAP_PARAM),
            sticky_scroll: flag(STICKY_SCROLL_PARAM),
        }),
        LinkMode::Snapshot => None,
    };

    log::debug!("Parsed {:?} link for language {}", mode, language_id);
    Some(IncomingLink {
        mode,
        language_id,
        content,
        flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eol::Eol;

    fn document(language: &str, content: &str) -> Document<()> {
        let mut doc = Document::new(Eol::Lf);
        doc.load(content.to_string(), Some(language), "notes", None);
        doc
    }

    #[test]
    fn test_builder_normalizes_base() {
        let links = LinkBuilder::new("https://example.com/notepad?x=1#top").unwrap();
        assert_eq!(links.base().as_str(), "https://example.com/notepad/");
        assert!(LinkBuilder::new("not a url").is_err());
        assert!(LinkBuilder::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_snapshot_link_shape() {
        let doc = document("markdown", "# Title");
        let url = LinkBuilder::default().build_snapshot_link(&doc).unwrap();
        let token = codec::encode("# Title");
        let shown = url.as_str().replace(&token, "TOKEN");
        insta::assert_snapshot!(shown, @"http://localhost:5173/?snapshot=1&language=markdown&value=TOKEN");
    }

    #[test]
    fn test_empty_document_has_no_link() {
        let doc = document("plaintext", "");
        let links = LinkBuilder::default();
        assert!(links.build_snapshot_link(&doc).is_none());
        assert!(links
            .build_embed_link(&doc, DisplayFlags::default())
            .is_none());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let doc = document("rust", "fn main() {\r\n    println!(\"é & ü\");\r\n}\r\n");
        let url = LinkBuilder::default().build_snapshot_link(&doc).unwrap();
        let link = parse_incoming_link(&url).unwrap();
        assert_eq!(link.mode, LinkMode::Snapshot);
        assert_eq!(link.language_id, doc.language_id());
        assert_eq!(link.content, doc.content());
        assert!(link.flags.is_none());
    }

    #[test]
    fn test_embed_link_only_carries_true_flags() {
        let doc = document("markdown", "# Title");
        let flags = DisplayFlags {
            read_only: false,
            line_numbers: false,
            minimap: true,
            sticky_scroll: false,
        };
        let url = LinkBuilder::default().build_embed_link(&doc, flags).unwrap();
        let token = codec::encode("# Title");
        let shown = url.as_str().replace(&token, "TOKEN");
        insta::assert_snapshot!(shown, @"http://localhost:5173/app/embed?language=markdown&value=TOKEN&minimap=1");

        let link = parse_incoming_link(&url).unwrap();
        assert_eq!(link.mode, LinkMode::Embed);
        assert_eq!(link.content, "# Title");
        assert_eq!(link.flags, Some(flags));
    }

    #[test]
    fn test_embed_link_under_base_path() {
        let doc = document("css", "a {}");
        let links = LinkBuilder::new("https://example.com/tools/notepad").unwrap();
        let all = DisplayFlags {
            read_only: true,
            line_numbers: true,
            minimap: true,
            sticky_scroll: true,
        };
        let url = links.build_embed_link(&doc, all).unwrap();
        assert_eq!(url.path(), "/tools/notepad/app/embed");
        let query = url.query().unwrap();
        assert!(query.ends_with("&readonly=1&lineNumbers=1&minimap=1&stickyScroll=1"));
        assert_eq!(parse_incoming_link(&url).unwrap().flags, Some(all));
    }

    #[test]
    fn test_parse_snapshot_path_route() {
        let token = codec::encode("hi");
        let url = Url::parse(&format!("http://host/app/snapshot?value={}", token)).unwrap();
        let link = parse_incoming_link(&url).unwrap();
        assert_eq!(link.mode, LinkMode::Snapshot);
        assert_eq!(link.language_id, PLAINTEXT);
        assert_eq!(link.content, "hi");
    }

    #[test]
    fn test_parse_missing_and_malformed_values() {
        let url = Url::parse("http://host/?snapshot=1&language=python").unwrap();
        let link = parse_incoming_link(&url).unwrap();
        assert_eq!(link.language_id, "python");
        assert_eq!(link.content, "");

        let url = Url::parse("http://host/?snapshot=1&value=%%%garbage").unwrap();
        let link = parse_incoming_link(&url).unwrap();
        assert_eq!(link.language_id, PLAINTEXT);
        assert_eq!(link.content, "");
    }

    #[test]
    fn test_parse_embed_without_flags() {
        let url = Url::parse("http://host/app/embed/").unwrap();
        let link = parse_incoming_link(&url).unwrap();
        assert_eq!(link.mode, LinkMode::Embed);
        assert_eq!(link.flags, Some(DisplayFlags::default()));
    }

    #[test]
    fn test_parse_ignores_other_urls() {
        assert!(parse_incoming_link(&Url::parse("http://host/app").unwrap()).is_none());
        assert!(parse_incoming_link(&Url::parse("http://host/?snapshot=").unwrap()).is_none());
        assert!(parse_incoming_link(&Url::parse("http://host/?language=go").unwrap()).is_none());
    }
}
