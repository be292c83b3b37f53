//! The page tree.
//!
//! [`Pages`] keeps a sparse, index-addressed list of page references. Pages
//! either claim a fixed slot or append. Any slot still empty at output time
//! is a structural error and aborts serialization.

use crate::array::Array;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::name::Name;
use crate::object::{Identity, Object, ObjectRef, PdfObject};
use crate::rectangle::Rectangle;
use crate::writer::WriteContext;
use std::io::Write;

/// The `/Pages` node.
#[derive(Debug, Clone, Default)]
pub struct Pages {
    identity: Identity,
    kids: Vec<Option<ObjectRef>>,
}

impl Pages {
    /// Create an empty page tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots (filled or not).
    pub fn count(&self) -> usize {
        self.kids.len()
    }

    /// Reference stored at `index`, if that slot is filled.
    pub fn kid(&self, index: usize) -> Option<ObjectRef> {
        self.kids.get(index).copied().flatten()
    }

    /// Fail if `index` is already taken.
    pub fn check_slot(&self, index: usize) -> Result<()> {
        if self.kid(index).is_some() {
            return Err(Error::illegal_state(format!(
                "A page already exists at index {} (zero-based)",
                index
            )));
        }
        Ok(())
    }

    /// Record a page at `index`, or append it when no index is given.
    pub fn notify_kid_registered(&mut self, index: Option<usize>, page: ObjectRef) -> Result<()> {
        match index {
            Some(index) => {
                self.check_slot(index)?;
                if self.kids.len() <= index {
                    self.kids.resize(index + 1, None);
                }
                self.kids[index] = Some(page);
            },
            None => self.kids.push(Some(page)),
        }
        Ok(())
    }

    /// The `/Kids` array. Fails on the first unfilled slot.
    pub fn kids_array(&self) -> Result<Array> {
        let mut kids = Array::with_capacity(self.kids.len());
        for (index, kid) in self.kids.iter().enumerate() {
            match kid {
                Some(reference) => kids.push(*reference),
                None => {
                    return Err(Error::illegal_state(format!(
                        "Gap in kids list: no page at index {}",
                        index
                    )))
                },
            }
        }
        Ok(kids)
    }
}

impl PdfObject for Pages {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        let mut dict = Dictionary::with_type("Pages");
        dict.put("Count", self.kids.len());
        dict.put("Kids", self.kids_array()?);
        ctx.serializer.write_dictionary(w, &dict)
    }
}

/// A `/Page` object.
#[derive(Debug, Clone)]
pub struct Page {
    identity: Identity,
    page_index: Option<usize>,
    parent: Option<ObjectRef>,
    media_box: Rectangle,
    crop_box: Option<Rectangle>,
    bleed_box: Option<Rectangle>,
    trim_box: Option<Rectangle>,
    contents: Option<ObjectRef>,
    resources: Option<Object>,
    annots: Vec<ObjectRef>,
    struct_parents: Option<i64>,
    extra: Dictionary,
}

impl Page {
    /// Create a page that is appended to the page tree.
    pub fn new(media_box: Rectangle) -> Self {
        Self {
            identity: Identity::new(),
            page_index: None,
            parent: None,
            media_box,
            crop_box: None,
            bleed_box: None,
            trim_box: None,
            contents: None,
            resources: None,
            annots: Vec::new(),
            struct_parents: None,
            extra: Dictionary::new(),
        }
    }

    /// Create a page that claims slot `index` of the page tree.
    pub fn at_index(media_box: Rectangle, index: usize) -> Self {
        let mut page = Self::new(media_box);
        page.page_index = Some(index);
        page
    }

    /// Slot claimed in the page tree, if any.
    pub fn page_index(&self) -> Option<usize> {
        self.page_index
    }

    /// The media box.
    pub fn media_box(&self) -> Rectangle {
        self.media_box
    }

    /// Set the parent `/Pages` node.
    pub fn set_parent(&mut self, parent: ObjectRef) {
        self.parent = Some(parent);
    }

    /// Set the crop box.
    pub fn set_crop_box(&mut self, rect: Rectangle) {
        self.crop_box = Some(rect);
    }

    /// Set the bleed box.
    pub fn set_bleed_box(&mut self, rect: Rectangle) {
        self.bleed_box = Some(rect);
    }

    /// Set the trim box.
    pub fn set_trim_box(&mut self, rect: Rectangle) {
        self.trim_box = Some(rect);
    }

    /// Set the content stream.
    pub fn set_contents(&mut self, contents: ObjectRef) {
        self.contents = Some(contents);
    }

    /// Set the resources, either inline or as a reference.
    pub fn set_resources(&mut self, resources: impl Into<Object>) {
        self.resources = Some(resources.into());
    }

    /// Add an annotation.
    pub fn add_annotation(&mut self, annot: ObjectRef) {
        self.annots.push(annot);
    }

    /// Set the `/StructParents` key of this page in the parent tree.
    pub fn set_struct_parents(&mut self, key: i64) {
        self.struct_parents = Some(key);
    }

    /// Add any other page entry (e.g. `/Rotate`, `/Group`).
    pub fn put(&mut self, key: impl Into<Name>, value: impl Into<Object>) {
        self.extra.put(key, value);
    }

    fn to_dictionary(&self) -> Result<Dictionary> {
        let parent = self
            .parent
            .ok_or_else(|| Error::illegal_state("Page has not been added to a page tree"))?;
        let mut dict = Dictionary::with_type("Page");
        dict.put_ref("Parent", parent);
        dict.put("MediaBox", self.media_box);
        if let Some(rect) = self.crop_box {
            dict.put("CropBox", rect);
        }
        if let Some(rect) = self.bleed_box {
            dict.put("BleedBox", rect);
        }
        if let Some(rect) = self.trim_box {
            dict.put("TrimBox", rect);
        }
        if let Some(resources) = &self.resources {
            dict.put("Resources", resources.clone());
        }
        if let Some(contents) = self.contents {
            dict.put_ref("Contents", contents);
        }
        if !self.annots.is_empty() {
            let annots: Array = self.annots.iter().map(|r| Object::Reference(*r)).collect();
            dict.put("Annots", annots);
        }
        if let Some(key) = self.struct_parents {
            dict.put("StructParents", key);
        }
        for (key, value) in &self.extra {
            dict.put(key.clone(), value.clone());
        }
        Ok(dict)
    }
}

impl PdfObject for Page {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        let dict = self.to_dictionary()?;
        ctx.serializer.write_dictionary(w, &dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(id: u32) -> ObjectRef {
        ObjectRef::new(id, 0)
    }

    #[test]
    fn test_append_and_index() {
        let mut pages = Pages::new();
        pages.notify_kid_registered(None, r(4)).unwrap();
        pages.notify_kid_registered(Some(2), r(6)).unwrap();
        assert_eq!(pages.count(), 3);
        assert!(pages.kids_array().is_err());

        pages.notify_kid_registered(Some(1), r(5)).unwrap();
        let kids = pages.kids_array().unwrap();
        let ids: Vec<u32> = kids.iter().filter_map(|k| k.as_reference()).map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 5, 6]);
    }

    #[test]
    fn test_occupied_slot() {
        let mut pages = Pages::new();
        pages.notify_kid_registered(Some(0), r(4)).unwrap();
        let err = pages.notify_kid_registered(Some(0), r(5)).unwrap_err();
        assert!(err.to_string().contains("A page already exists at index 0"));
    }

    #[test]
    fn test_page_dictionary() {
        let mut page = Page::new(Rectangle::new(0.0, 0.0, 595.0, 842.0));
        assert!(page.to_dictionary().is_err());
        page.set_parent(r(2));
        page.set_contents(r(9));
        page.set_struct_parents(0);
        page.put("Rotate", 90);
        let dict = page.to_dictionary().unwrap();
        assert_eq!(dict.get("Parent"), Some(&Object::Reference(r(2))));
        assert_eq!(dict.get("StructParents"), Some(&Object::Integer(0)));
        assert_eq!(dict.get("Rotate"), Some(&Object::Integer(90)));
        assert!(dict.get("CropBox").is_none());
    }
}
