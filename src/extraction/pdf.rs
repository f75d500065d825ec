//! PDF text extraction.
//!
//! Extraction never fails outward: a document that cannot be parsed yields an empty string,
//! which callers treat as the failure sentinel.

use pdf_extract::OutputError;

/// Extract the text layer of every page, concatenated in document order.
///
/// Runs on the blocking pool. A panic inside the PDF parser is contained and reported as an
/// empty string like any other parse failure.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> String {
    match tokio::task::spawn_blocking(move || extract_pdf_text_blocking(&bytes)).await {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!(error = %error, "PDF extraction task aborted");
            String::new()
        }
    }
}

/// Synchronous variant of [`extract_pdf_text`].
pub fn extract_pdf_text_blocking(bytes: &[u8]) -> String {
    match extract_pages(bytes) {
        Ok(pages) => {
            tracing::debug!(pages = pages.len(), "Extracted PDF text");
            pages.concat()
        }
        Err(error) => {
            tracing::warn!(error = %error, bytes = bytes.len(), "PDF processing error");
            String::new()
        }
    }
}

fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, OutputError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a minimal PDF with one Helvetica text line per page.
    pub(crate) fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let page_count = pages.len();
        let font_id = 3 + page_count * 2;
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {page_count} >>",
                (0..page_count)
                    .map(|index| format!("{} 0 R", 3 + index * 2))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
        ];
        for (index, text) in pages.iter().enumerate() {
            let page_id = 3 + index * 2;
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {} 0 R >>",
                page_id + 1
            ));
            let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", index + 1).as_bytes());
        }
        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        out
    }

    #[test]
    fn pages_are_concatenated_in_document_order() {
        let pdf = pdf_with_pages(&["Mitochondria", "Photosynthesis"]);
        let text = extract_pdf_text_blocking(&pdf);
        let first = text.find("Mitochondria").expect("first page text");
        let second = text.find("Photosynthesis").expect("second page text");
        assert!(first < second, "pages out of order: {text:?}");
    }

    #[test]
    fn garbage_bytes_yield_empty_text() {
        assert_eq!(extract_pdf_text_blocking(b"definitely not a pdf"), "");
    }

    #[test]
    fn empty_input_yields_empty_text() {
        assert_eq!(extract_pdf_text_blocking(&[]), "");
    }

    #[tokio::test]
    async fn truncated_pdf_header_is_contained() {
        let text = extract_pdf_text(b"%PDF-1.4\n1 0 obj\n<<".to_vec()).await;
        assert_eq!(text, "");
    }
}
