use printpdf::*;
use std::io::BufWriter;

use super::layout::{Color, FontWeight, PAGE_HEIGHT, PAGE_WIDTH};
use super::RenderError;

/// Document-level metadata written into the PDF info dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: Vec<String>,
    pub creator: String,
}

/// Drawing backend the layout engine writes to. Pages are 1-based.
pub trait Canvas {
    /// Start a new page and make it current; returns its page number.
    fn begin_page(&mut self) -> Result<usize, RenderError>;
    fn page_count(&self) -> usize;
    /// Make an already started page current again.
    fn select_page(&mut self, page: usize) -> Result<(), RenderError>;
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) -> Result<(), RenderError>;
    fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, color: Color) -> Result<(), RenderError>;
    fn text(&mut self, text: &str, size: f32, x: f32, y: f32, weight: FontWeight, color: Color) -> Result<(), RenderError>;
}

/// `printpdf`-backed canvas using the built-in Helvetica faces.
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    initial: Option<(PdfPageIndex, PdfLayerIndex)>,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    current: Option<usize>,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl PdfCanvas {
    pub fn new(info: &DocumentInfo) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(&info.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let doc = doc
            .with_author(info.author.clone())
            .with_subject(info.subject.clone())
            .with_keywords(info.keywords.clone())
            .with_creator(info.creator.clone());
        let font = |builtin: BuiltinFont| {
            doc.add_builtin_font(builtin).map_err(|e| RenderError::Backend(format!("PDF font error: {e}")))
        };
        let regular = font(BuiltinFont::Helvetica)?;
        let bold = font(BuiltinFont::HelveticaBold)?;
        let italic = font(BuiltinFont::HelveticaOblique)?;
        Ok(Self { doc, initial: Some((page, layer)), pages: Vec::new(), current: None, regular, bold, italic })
    }

    fn layer(&self) -> Result<PdfLayerReference, RenderError> {
        let (page, layer) = self.current.and_then(|i| self.pages.get(i)).ok_or(RenderError::NoPage)?;
        Ok(self.doc.get_page(*page).get_layer(*layer))
    }

    fn font(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
            FontWeight::Italic => &self.italic,
        }
    }

    /// Serialize the finished document.
    pub fn finish(self) -> Result<Vec<u8>, RenderError> {
        let mut writer = BufWriter::new(Vec::new());
        self.doc
            .save(&mut writer)
            .map_err(|e| RenderError::Backend(format!("PDF save error: {e}")))?;
        writer
            .into_inner()
            .map_err(|e| RenderError::Backend(format!("PDF buffer error: {e}")))
    }
}

fn pdf_color(color: Color) -> printpdf::Color {
    let (r, g, b) = color.to_unit();
    printpdf::Color::Rgb(Rgb::new(r, g, b, None))
}

impl Canvas for PdfCanvas {
    fn begin_page(&mut self) -> Result<usize, RenderError> {
        let indices = match self.initial.take() {
            Some(first) => first,
            None => self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {}", self.pages.len() + 1)),
        };
        self.pages.push(indices);
        self.current = Some(self.pages.len() - 1);
        Ok(self.pages.len())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn select_page(&mut self, page: usize) -> Result<(), RenderError> {
        if page == 0 || page > self.pages.len() {
            return Err(RenderError::PageOutOfRange(page));
        }
        self.current = Some(page - 1);
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) -> Result<(), RenderError> {
        let layer = self.layer()?;
        layer.set_fill_color(pdf_color(color));
        layer.add_rect(printpdf::Rect::new(Mm(x), Mm(y), Mm(x + width), Mm(y + height)));
        Ok(())
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, color: Color) -> Result<(), RenderError> {
        let layer = self.layer()?;
        layer.set_outline_color(pdf_color(color));
        layer.set_outline_thickness(thickness);
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from.0), Mm(from.1)), false),
                (Point::new(Mm(to.0), Mm(to.1)), false),
            ],
            is_closed: false,
        });
        Ok(())
    }

    fn text(&mut self, text: &str, size: f32, x: f32, y: f32, weight: FontWeight, color: Color) -> Result<(), RenderError> {
        let layer = self.layer()?;
        layer.set_fill_color(pdf_color(color));
        layer.use_text(text, size, Mm(x), Mm(y), self.font(weight));
        Ok(())
    }
}

#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Rect { x: f32, y: f32, width: f32, height: f32, color: Color },
        Line { from: (f32, f32), to: (f32, f32), color: Color },
        Text { text: String, size: f32, x: f32, y: f32, weight: FontWeight, color: Color },
    }

    /// Canvas that records every drawing call per page.
    #[derive(Debug, Default)]
    pub struct RecordingCanvas {
        pub pages: Vec<Vec<Op>>,
        current: Option<usize>,
    }

    impl RecordingCanvas {
        fn ops(&mut self) -> Result<&mut Vec<Op>, RenderError> {
            let index = self.current.ok_or(RenderError::NoPage)?;
            Ok(&mut self.pages[index])
        }

        /// Text runs drawn on a 1-based page, with their size and baseline.
        pub fn texts(&self, page: usize) -> Vec<(String, f32, f32)> {
            self.pages[page - 1]
                .iter()
                .filter_map(|op| match op {
                    Op::Text { text, size, y, .. } => Some((text.clone(), *size, *y)),
                    _ => None,
                })
                .collect()
        }

        pub fn all_text(&self, page: usize) -> String {
            self.texts(page).into_iter().map(|(t, _, _)| t).collect::<Vec<_>>().join("\n")
        }
    }

    impl Canvas for RecordingCanvas {
        fn begin_page(&mut self) -> Result<usize, RenderError> {
            self.pages.push(Vec::new());
            self.current = Some(self.pages.len() - 1);
            Ok(self.pages.len())
        }

        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn select_page(&mut self, page: usize) -> Result<(), RenderError> {
            if page == 0 || page > self.pages.len() {
                return Err(RenderError::PageOutOfRange(page));
            }
            self.current = Some(page - 1);
            Ok(())
        }

        fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) -> Result<(), RenderError> {
            self.ops()?.push(Op::Rect { x, y, width, height, color });
            Ok(())
        }

        fn line(&mut self, from: (f32, f32), to: (f32, f32), _thickness: f32, color: Color) -> Result<(), RenderError> {
            self.ops()?.push(Op::Line { from, to, color });
            Ok(())
        }

        fn text(&mut self, text: &str, size: f32, x: f32, y: f32, weight: FontWeight, color: Color) -> Result<(), RenderError> {
            self.ops()?.push(Op::Text { text: text.to_string(), size, x, y, weight, color });
            Ok(())
        }
    }
}
