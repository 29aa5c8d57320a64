//! `META-INF/container.xml`, the pointer every reader opens first

use super::escape;

/// Render the container document pointing at the package document
pub fn container_document(package_path: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<container xmlns="urn:oasis:names:tc:opendocument:xmlns:container" version="1.0">
  <rootfiles>
    <rootfile full-path="{}" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#,
        escape(package_path)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_at_package() {
        let doc = container_document("epub/content.opf");
        assert!(doc.contains(r#"full-path="epub/content.opf""#));
        assert!(doc.starts_with("<?xml"));
    }
}
