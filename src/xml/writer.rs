use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::xml::{Namespace, XmlError};

/// Builds a document one nested element at a time.
///
/// All namespaces are declared once, on the root element.
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
    open: Vec<Box<str>>,
}

impl XmlWriter {
    pub fn begin(root: &str, namespaces: &[Namespace]) -> Result<Self, XmlError> {
        let mut writer = Writer::new(Vec::with_capacity(1024));

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut start = BytesStart::new(root);

        for namespace in namespaces {
            let key = format!("xmlns:{}", namespace.prefix);

            start.push_attribute((key.as_str(), namespace.uri));
        }

        writer.write_event(Event::Start(start))?;

        Ok(Self {
            writer,
            open: vec![Box::from(root)],
        })
    }

    /// Opens `name`; subsequent elements become its children until [`XmlWriter::leave`].
    pub fn enter(&mut self, name: &str) -> Result<(), XmlError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))?;

        self.open.push(Box::from(name));

        Ok(())
    }

    /// Closes the innermost element opened with [`XmlWriter::enter`].
    pub fn leave(&mut self) -> Result<(), XmlError> {
        if self.open.len() <= 1 {
            return Err(XmlError::LeaveRoot);
        }

        if let Some(name) = self.open.pop() {
            self.writer
                .write_event(Event::End(BytesEnd::new(name.into_string())))?;
        }

        Ok(())
    }

    /// Adds `<name>value</name>` to the current element.
    pub fn add_text(&mut self, name: &str, value: &str) -> Result<(), XmlError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))?;
        self.writer.write_event(Event::Text(BytesText::new(value)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;

        Ok(())
    }

    /// Closes every element still open, including the root, and returns the document.
    pub fn finish(mut self) -> Result<Box<[u8]>, XmlError> {
        while let Some(name) = self.open.pop() {
            self.writer
                .write_event(Event::End(BytesEnd::new(name.into_string())))?;
        }

        Ok(self.writer.into_inner().into_boxed_slice())
    }
}
