//! CSV export of saved articles.

use crate::db::SavedArticle;

pub const CSV_HEADER: [&str; 6] = [
    "title",
    "url",
    "description",
    "source",
    "published_at",
    "image_url",
];

/// Renders bookmarks as RFC 4180 CSV with CRLF line endings.
#[must_use]
pub fn bookmarks_to_csv(articles: &[SavedArticle]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER);

    for a in articles {
        push_row(
            &mut out,
            [
                a.title.as_str(),
                a.url.as_str(),
                a.description.as_str(),
                a.source.as_str(),
                a.published_at.as_str(),
                a.image_url.as_str(),
            ],
        );
    }

    out
}

fn push_row<const N: usize>(out: &mut String, fields: [&str; N]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn saved(title: &str, description: &str) -> SavedArticle {
        SavedArticle {
            id: 1,
            title: title.to_string(),
            url: "https://example.com/x".to_string(),
            description: description.to_string(),
            source: "Wire".to_string(),
            published_at: "2025-01-01T00:00:00Z".to_string(),
            image_url: String::new(),
            saved_at: "2025-01-02T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_header_only() {
        assert_eq!(
            bookmarks_to_csv(&[]),
            "title,url,description,source,published_at,image_url\r\n"
        );
    }

    #[test]
    fn test_quoting() {
        let csv = bookmarks_to_csv(&[saved("Plain", "He said \"hi\", then\nleft")]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("Plain,https://example.com/x,\"He said \"\"hi\"\", then"));
        assert!(csv.ends_with("left\",Wire,2025-01-01T00:00:00Z,\r\n"));
    }
}
