//! Document-level types.

use super::header_footer::{HeaderFooter, HeaderFooterKind, HeaderFooterMut, NS_R};
use super::paragraph::{Paragraph, ParagraphMut};
use super::section::{
    collect_sect_prs, collect_sect_prs_mut, reference_id, Section, SectionMut,
};
use crate::detect::{is_zip_bytes, locate_main_part};
use crate::error::{Error, Result};
use crate::package::{
    rels_part_for, relative_target, resolve_target, ContentTypes, Package, Relationships,
    CONTENT_TYPES_PART, ROOT_RELS_PART,
};
use crate::xml::{Element, XmlDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;

const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

static EMPTY_BODY: Element = Element {
    name: String::new(),
    attrs: Vec::new(),
    children: Vec::new(),
};

/// An opened word-processing document.
///
/// Parts the model never touches stay as raw bytes in the package and are
/// written back unchanged by [`Document::to_bytes`].
#[derive(Debug, Clone)]
pub struct Document {
    package: Package,
    main_part: String,
    main: XmlDocument,
    rels: Relationships,
    content_types: ContentTypes,
    /// Header and footer parts loaded for editing, keyed by part name
    stories: BTreeMap<String, XmlDocument>,
    metadata: Metadata,
}

impl Document {
    /// Open a document from DOCX bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !is_zip_bytes(data) {
            return Err(Error::UnknownFormat);
        }
        Self::from_package(Package::from_bytes(data)?)
    }

    /// Open a document from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Open a document from an already-read package.
    pub fn from_package(package: Package) -> Result<Self> {
        let main_part = locate_main_part(&package)?;
        let main = XmlDocument::from_bytes(package.require(&main_part)?)?;
        if main.root.child("w:body").is_none() {
            return Err(Error::NotWordDocument(format!(
                "{} has no w:body",
                main_part
            )));
        }
        let rels = match package.get(&rels_part_for(&main_part)) {
            Some(data) => Relationships::from_bytes(data)?,
            None => Relationships::new(),
        };
        let content_types = ContentTypes::from_bytes(package.require(CONTENT_TYPES_PART)?)?;
        let metadata = Metadata::from_package(&package);

        log::debug!(
            "Opened {} ({} parts, {} relationships)",
            main_part,
            package.len(),
            rels.len()
        );

        Ok(Self {
            package,
            main_part,
            main,
            rels,
            content_types,
            stories: BTreeMap::new(),
            metadata,
        })
    }

    /// Serialize the document back to DOCX bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut package = self.package.clone();
        package.put(self.main_part.as_str(), self.main.to_bytes());
        let rels_part = rels_part_for(&self.main_part);
        if !self.rels.is_empty() || package.contains(&rels_part) {
            package.put(rels_part, self.rels.to_bytes());
        }
        package.put(CONTENT_TYPES_PART, self.content_types.to_bytes());
        for (part, xml) in &self.stories {
            package.put(part.as_str(), xml.to_bytes());
        }
        package.to_bytes()
    }

    /// Serialize the document to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Name of the main document part (usually `word/document.xml`).
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Core document properties.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn body(&self) -> &Element {
        self.main.root.child("w:body").unwrap_or(&EMPTY_BODY)
    }

    fn body_mut(&mut self) -> &mut Element {
        self.main.root.get_or_insert_ordered("w:body", &[])
    }

    /// Number of sections.
    pub fn section_count(&self) -> usize {
        collect_sect_prs(self.body()).len()
    }

    /// Give a document without section properties a body-level `w:sectPr`.
    ///
    /// Returns `true` if one was created.
    pub fn ensure_section(&mut self) -> bool {
        if self.section_count() > 0 {
            return false;
        }
        self.body_mut().push(Element::new("w:sectPr"));
        log::debug!("Added missing body section properties");
        true
    }

    /// Snapshots of all sections with the header and footer in effect for each.
    pub fn sections(&self) -> Result<Vec<Section>> {
        let sect_prs = collect_sect_prs(self.body());
        let mut sections = Vec::with_capacity(sect_prs.len());
        for (index, sect_pr) in sect_prs.iter().enumerate() {
            let mut section = Section::from_element(index, sect_pr);
            section.header = self.story_snapshot(&sect_prs, index, HeaderFooterKind::Header)?;
            section.footer = self.story_snapshot(&sect_prs, index, HeaderFooterKind::Footer)?;
            sections.push(section);
        }
        Ok(sections)
    }

    /// Mutable view of one section.
    pub fn section_mut(&mut self, index: usize) -> Result<SectionMut<'_>> {
        let count = self.section_count();
        collect_sect_prs_mut(self.body_mut())
            .into_iter()
            .nth(index)
            .map(|el| SectionMut::new(index, el))
            .ok_or(Error::SectionOutOfRange(index, count))
    }

    /// Mutable views of all sections in document order.
    pub fn sections_mut(&mut self) -> Vec<SectionMut<'_>> {
        collect_sect_prs_mut(self.body_mut())
            .into_iter()
            .enumerate()
            .map(|(index, el)| SectionMut::new(index, el))
            .collect()
    }

    /// Number of body paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.body().children_named("w:p").count()
    }

    /// Snapshots of the body paragraphs.
    pub fn paragraphs(&self) -> Vec<Paragraph> {
        self.body()
            .children_named("w:p")
            .map(Paragraph::from_element)
            .collect()
    }

    /// Mutable views of the body paragraphs in document order.
    pub fn paragraphs_mut(&mut self) -> Vec<ParagraphMut<'_>> {
        self.body_mut()
            .elements_mut()
            .filter(|el| el.name == "w:p")
            .map(ParagraphMut::new)
            .collect()
    }

    /// Plain text of the body, one paragraph per line.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Default header in effect for a section, created if no section defines one.
    pub fn header_mut(&mut self, index: usize) -> Result<HeaderFooterMut<'_>> {
        self.header_footer_mut(index, HeaderFooterKind::Header)
    }

    /// Default footer in effect for a section, created if no section defines one.
    pub fn footer_mut(&mut self, index: usize) -> Result<HeaderFooterMut<'_>> {
        self.header_footer_mut(index, HeaderFooterKind::Footer)
    }

    /// Default header or footer in effect for a section.
    ///
    /// A section without its own reference inherits the closest earlier
    /// section's part. When no section up to `index` has one, a new part is
    /// added to the package and referenced from the first section.
    pub fn header_footer_mut(
        &mut self,
        index: usize,
        kind: HeaderFooterKind,
    ) -> Result<HeaderFooterMut<'_>> {
        let count = self.section_count();
        if index >= count {
            return Err(Error::SectionOutOfRange(index, count));
        }
        let inherited = {
            let sect_prs = collect_sect_prs(self.body());
            (0..=index)
                .rev()
                .find_map(|i| reference_id(sect_prs[i], kind))
        };
        let part = match inherited {
            Some(rel_id) => self.story_part(&rel_id)?,
            None => self.add_story(kind),
        };

        let xml = match self.stories.entry(part.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(XmlDocument::from_bytes(self.package.require(&part)?)?)
            }
        };
        Ok(HeaderFooterMut::new(kind, part, &mut xml.root))
    }

    fn story_part(&self, rel_id: &str) -> Result<String> {
        let rel = self.rels.get(rel_id).ok_or_else(|| {
            Error::MissingPart(format!(
                "{} (relationship {})",
                rels_part_for(&self.main_part),
                rel_id
            ))
        })?;
        Ok(resolve_target(&self.main_part, &rel.target))
    }

    fn story_snapshot(
        &self,
        sect_prs: &[&Element],
        index: usize,
        kind: HeaderFooterKind,
    ) -> Result<Option<HeaderFooter>> {
        let Some((owner, rel_id)) = (0..=index)
            .rev()
            .find_map(|i| reference_id(sect_prs[i], kind).map(|id| (i, id)))
        else {
            return Ok(None);
        };
        let part = self.story_part(&rel_id)?;
        let linked = owner != index;
        let snapshot = match self.stories.get(&part) {
            Some(xml) => HeaderFooter::from_root(kind, part.as_str(), linked, &xml.root),
            None => {
                let xml = XmlDocument::from_bytes(self.package.require(&part)?)?;
                HeaderFooter::from_root(kind, part.as_str(), linked, &xml.root)
            }
        };
        Ok(Some(snapshot))
    }

    /// Add a new header or footer part and reference it from the first section.
    fn add_story(&mut self, kind: HeaderFooterKind) -> String {
        let prefix = match self.main_part.rsplit_once('/') {
            Some((dir, _)) => format!("{}/{}", dir, kind.part_stem()),
            None => kind.part_stem().to_string(),
        };
        let part = self.package.next_part_name(&prefix, ".xml");
        let empty = kind.empty_part();
        self.package.put(part.as_str(), empty.to_bytes());
        self.stories.insert(part.clone(), empty);

        let rel_id = self
            .rels
            .add(kind.rel_type(), &relative_target(&self.main_part, &part));
        self.content_types.set_override(&part, kind.content_type());
        if self.main.root.attr("xmlns:r").is_none() {
            self.main.root.set_attr("xmlns:r", NS_R);
        }
        if let Some(first) = collect_sect_prs_mut(self.body_mut()).into_iter().next() {
            SectionMut::new(0, first).add_reference(kind, &rel_id);
        }

        log::debug!("Created {} part {} as {}", kind, part, rel_id);
        part
    }
}

/// Core document properties (`docProps/core.xml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Last editor
    pub last_modified_by: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    fn from_package(package: &Package) -> Self {
        let part = package
            .get(ROOT_RELS_PART)
            .and_then(|data| Relationships::from_bytes(data).ok())
            .and_then(|rels| rels.first_of_type(REL_CORE_PROPERTIES))
            .map(|rel| resolve_target("", &rel.target))
            .unwrap_or_else(|| "docProps/core.xml".to_string());
        let Some(data) = package.get(&part) else {
            return Self::default();
        };
        match XmlDocument::from_bytes(data) {
            Ok(xml) => Self::from_core(&xml.root),
            Err(e) => {
                log::warn!("Ignoring malformed {}: {}", part, e);
                Self::default()
            }
        }
    }

    fn from_core(root: &Element) -> Self {
        let text = |local: &str| {
            root.elements()
                .find(|el| el.local_name() == local)
                .map(|el| el.text().trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let date = |local: &str| {
            text(local)
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|d| d.with_timezone(&Utc))
        };
        Self {
            title: text("title"),
            subject: text("subject"),
            author: text("creator"),
            last_modified_by: text("lastModifiedBy"),
            created: date("created"),
            modified: date("modified"),
        }
    }
}
