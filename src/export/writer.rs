use bytes::Bytes;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::error::{ExportError, Result};
use super::target::ExportTarget;
use super::walker::Exporter;
use crate::graph::{Child, Key, Node, Value};

const CHUNK_DATA: &str = "data";
const CHUNK_NEXT: &str = "next";

/// Primary content of a document node
#[derive(Debug)]
pub enum Payload {
    Bytes(Bytes),
    /// Written as UTF-8
    Text(String),
    /// Head of a linked list of `{data, next}` chunk records
    Chain(Node),
}

impl Exporter {
    /// Write `payload` to `target`, then the node's sidecar metadata
    ///
    /// `source_field` names the field the payload came from; it is left out of
    /// the sidecar unless payload exclusion is turned off.
    pub fn write_content(
        &self,
        node: &Node,
        target: &ExportTarget,
        payload: Payload,
        source_field: Option<&Key>,
    ) -> Result<()> {
        let path = target.content_path();
        info!(path = %path.display(), type_name = node.type_name(), "Writing");

        let file = File::create(&path).map_err(|e| ExportError::io(&path, e))?;
        let mut out = BufWriter::new(file);
        let written = match payload {
            Payload::Bytes(data) => write_all(&mut out, &data, &path)?,
            Payload::Text(text) => write_all(&mut out, text.as_bytes(), &path)?,
            Payload::Chain(head) => self.write_chain(head, &mut out, &path)?,
        };
        out.flush().map_err(|e| ExportError::io(&path, e))?;
        self.stats().file_written(written);

        let exclude = source_field.filter(|_| self.excludes_payload_fields());
        self.write_metadata(node, target, exclude)
    }

    fn write_chain(&self, head: Node, out: &mut impl Write, path: &Path) -> Result<u64> {
        let mut seen = HashSet::new();
        let mut written = 0;
        let mut current = head;

        loop {
            if let Some(id) = current.identity() {
                if !seen.insert(id) {
                    return Err(ExportError::Cycle {
                        id,
                        path: path.to_path_buf(),
                    });
                }
            }

            written += match current.field(CHUNK_DATA) {
                Some(Value::Bytes(data)) => write_all(out, data, path)?,
                Some(Value::Text(text)) => write_all(out, text.as_bytes(), path)?,
                Some(_) => return Err(unexpected_chunk(&current, path)),
                None => {
                    return Err(ExportError::MissingField {
                        type_name: current.type_name().to_string(),
                        field: CHUNK_DATA.to_string(),
                        path: path.to_path_buf(),
                    });
                }
            };

            current = match current.child(&Key::from(CHUNK_NEXT), self.classifier())? {
                None | Some(Child::Scalar(Value::None)) => break,
                Some(Child::Node(next)) => next,
                Some(Child::Scalar(_)) => return Err(unexpected_chunk(&current, path)),
            };
        }

        Ok(written)
    }
}

fn write_all(out: &mut impl Write, data: &[u8], path: &Path) -> Result<u64> {
    out.write_all(data).map_err(|e| ExportError::io(path, e))?;
    Ok(data.len() as u64)
}

fn unexpected_chunk(node: &Node, path: &Path) -> ExportError {
    ExportError::UnexpectedShape {
        type_name: node.type_name().to_string(),
        expected: "a chunk record",
        path: path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::memory::MemoryObject;
    use crate::handlers::{DispatchRegistry, MappingHandler};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn exporter() -> Exporter {
        let mut registry = DispatchRegistry::new();
        registry.register_metadata("OFS.Image.Pdata", Arc::new(MappingHandler));
        Exporter::builder().registry(registry).build()
    }

    fn chunk(data: &'static [u8], next: Value) -> crate::graph::ObjectHandle {
        MemoryObject::mapping(
            "OFS.Image.Pdata",
            [("data", Value::bytes(data)), ("next", next)],
        )
    }

    #[test]
    fn test_chained_payload_is_concatenated() {
        let temp = TempDir::new().unwrap();
        let exporter = exporter();

        let tail = chunk(b"CD", Value::None);
        let head = exporter.node(chunk(b"AB", Value::Object(tail))).unwrap();
        let file = exporter
            .node(MemoryObject::mapping("OFS.Image.File", [("title", Value::text("f"))]))
            .unwrap();

        let target = ExportTarget::root(temp.path(), "file.bin");
        exporter
            .write_content(&file, &target, Payload::Chain(head), None)
            .unwrap();

        assert_eq!(fs::read(temp.path().join("file.bin")).unwrap(), b"ABCD");
        assert_eq!(exporter.stats().snapshot().bytes_written, 4);
    }

    #[test]
    fn test_text_payload_is_utf8() {
        let temp = TempDir::new().unwrap();
        let exporter = exporter();
        let node = exporter
            .node(MemoryObject::mapping("Doc", [("text", Value::text("héllo"))]))
            .unwrap();

        exporter
            .write_content(
                &node,
                &ExportTarget::root(temp.path(), "doc"),
                Payload::Text("héllo".to_string()),
                Some(&Key::from("text")),
            )
            .unwrap();

        assert_eq!(fs::read(temp.path().join("doc")).unwrap(), "héllo".as_bytes());
        assert!(!temp.path().join("doc.json").exists());
    }

    #[test]
    fn test_existing_file_is_truncated() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("doc"), b"much longer old content").unwrap();
        let exporter = exporter();
        let node = exporter
            .node(MemoryObject::mapping("Doc", Vec::<(Key, Value)>::new()))
            .unwrap();

        exporter
            .write_content(
                &node,
                &ExportTarget::root(temp.path(), "doc"),
                Payload::Bytes(Bytes::from_static(b"new")),
                None,
            )
            .unwrap();

        assert_eq!(fs::read(temp.path().join("doc")).unwrap(), b"new");
    }

    #[test]
    fn test_chunk_without_data_field() {
        let temp = TempDir::new().unwrap();
        let exporter = exporter();
        let head = exporter
            .node(MemoryObject::mapping("OFS.Image.Pdata", [("next", Value::None)]))
            .unwrap();
        let node = exporter
            .node(MemoryObject::mapping("Doc", Vec::<(Key, Value)>::new()))
            .unwrap();

        let err = exporter
            .write_content(&node, &ExportTarget::root(temp.path(), "doc"), Payload::Chain(head), None)
            .unwrap_err();
        assert!(matches!(err, ExportError::MissingField { ref field, .. } if field == "data"));
    }
}
