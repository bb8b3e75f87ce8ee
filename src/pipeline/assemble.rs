//! PDF assembly on top of `lopdf`.
//!
//! One [`PdfDocumentBuilder`] per output document. Each decoded image
//! becomes one page: the JPEG stream is embedded verbatim as an image
//! XObject with a `DCTDecode` filter, so the bytes produced by the codec
//! stage are never recompressed. The content stream draws the XObject
//! into the layout rectangle.
//!
//! Layout coordinates arrive in millimetres measured from the top-left
//! page corner; here they are converted to PDF points and flipped to the
//! bottom-left origin PDF requires.

use crate::pipeline::layout::PageLayout;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

const MM_TO_PT: f64 = 72.0 / 25.4;

/// Incrementally builds one PDF document, a page per image.
pub struct PdfDocumentBuilder {
    doc: Document,
    pages: Vec<ObjectId>,
    image_counter: u32,
}

impl PdfDocumentBuilder {
    pub fn new() -> Self {
        Self {
            doc: Document::with_version("1.5"),
            pages: Vec::new(),
            image_counter: 1,
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append one page carrying `jpeg` placed per `layout`.
    ///
    /// `width`/`height` are the pixel dimensions of the embedded JPEG.
    pub fn add_page(&mut self, jpeg: Vec<u8>, width: u32, height: u32, layout: &PageLayout) {
        let mut xobject = Dictionary::new();
        xobject.set("Type", "XObject");
        xobject.set("Subtype", "Image");
        xobject.set("Width", Object::Integer(i64::from(width)));
        xobject.set("Height", Object::Integer(i64::from(height)));
        xobject.set("ColorSpace", "DeviceRGB");
        xobject.set("BitsPerComponent", Object::Integer(8));
        xobject.set("Filter", "DCTDecode");
        let image_id = self.doc.add_object(Stream::new(xobject, jpeg));

        let resource_name = format!("Im{}", self.image_counter);
        self.image_counter += 1;

        let page_w_pt = layout.page_width * MM_TO_PT;
        let page_h_pt = layout.page_height * MM_TO_PT;
        let w_pt = layout.width * MM_TO_PT;
        let h_pt = layout.height * MM_TO_PT;
        let x_pt = layout.x * MM_TO_PT;
        // Flip from top-left to PDF's bottom-left origin.
        let y_pt = page_h_pt - layout.y * MM_TO_PT - h_pt;

        let contents = format!(
            "q\n{w_pt:.4} 0 0 {h_pt:.4} {x_pt:.4} {y_pt:.4} cm\n/{resource_name} Do\nQ\n"
        );
        let contents_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), contents.into_bytes()));

        let mut xobj_map = Dictionary::new();
        xobj_map.set(resource_name, image_id);
        let mut resources = Dictionary::new();
        resources.set("XObject", xobj_map);

        let mut page = Dictionary::new();
        page.set("Type", "Page");
        page.set(
            "MediaBox",
            vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page_w_pt as f32),
                Object::Real(page_h_pt as f32),
            ],
        );
        page.set("Resources", resources);
        page.set("Contents", contents_id);

        let page_id = self.doc.add_object(page);
        self.pages.push(page_id);
        debug!(page = self.pages.len(), width, height, "added page");
    }

    /// Build the Pages tree and Catalog so the document can be saved.
    fn finalize(&mut self) {
        let kids: Vec<Object> = self.pages.iter().map(|id| Object::Reference(*id)).collect();
        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", "Pages");
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", Object::Integer(self.pages.len() as i64));
        let pages_id = self.doc.add_object(pages_dict);

        for &page_id in &self.pages {
            if let Ok(Object::Dictionary(page_dict)) = self.doc.get_object_mut(page_id) {
                page_dict.set("Parent", pages_id);
            }
        }

        let mut catalog = Dictionary::new();
        catalog.set("Type", "Catalog");
        catalog.set("Pages", pages_id);
        let catalog_id = self.doc.add_object(catalog);
        self.doc.trailer.set("Root", catalog_id);
    }

    /// Serialise the document to bytes.
    pub fn save_to_bytes(mut self) -> Result<Vec<u8>, lopdf::Error> {
        self.finalize();
        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Serialise the document and write it to `path`.
    pub fn save(self, path: &Path) -> Result<(), std::io::Error> {
        let bytes = self
            .save_to_bytes()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        File::create(path)?.write_all(&bytes)?;
        Ok(())
    }
}

impl Default for PdfDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
