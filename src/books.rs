//! Book values and the remote operations that work with them.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
    config::Config,
    credentials::Credential,
    diagnostics::Diagnostics,
    error::{Error, Result},
    gateway::{Gateway, Outcome, UploadOutcome, error_messages},
    operations::{CREATE_BOOK, Operation, READING_LIST, SIGNED_UPLOAD_URL},
    palette,
    paths::display_path,
};

/// Number of books requested per reading-list page.
const PAGE_SIZE: usize = 50;

/// Upper bound on reading-list pages fetched in one listing.
const MAX_PAGES: usize = 200;

/// Fallback shown when a book has no authors.
const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A book author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: String,
}

/// A book as returned by the reading-list query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Book {
    /// Remote identifier.
    pub id: String,
    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Main title.
    pub title: String,
    /// Optional subtitle.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Credited authors.
    #[serde(default)]
    pub authors: Vec<Author>,
}

/// Physical format of a book edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhysicalFormat {
    /// Hardcover print.
    Hardcover,
    /// Paperback print.
    Paperback,
    /// Electronic edition.
    Ebook,
    /// Audio edition.
    Audiobook,
}

impl PhysicalFormat {
    /// All formats in prompt order.
    pub fn all() -> &'static [Self] {
        &[Self::Hardcover, Self::Paperback, Self::Ebook, Self::Audiobook]
    }
}

impl fmt::Display for PhysicalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Hardcover => "Hardcover",
            Self::Paperback => "Paperback",
            Self::Ebook => "E-book",
            Self::Audiobook => "Audiobook",
        };
        f.write_str(label)
    }
}

/// Fields for a new book record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    /// Main title.
    pub title: String,
    /// Optional subtitle.
    pub subtitle: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Author names.
    pub authors: Vec<String>,
    /// Language code.
    pub language: String,
    /// Publication date, `YYYY-MM-DD`.
    pub published_date: Option<String>,
    /// ISBN-10.
    pub isbn10: Option<String>,
    /// ISBN-13.
    pub isbn13: Option<String>,
    /// Number of pages.
    pub page_count: Option<u32>,
    /// Publisher name.
    pub publisher: Option<String>,
    /// Whether the book has mature content.
    pub mature: bool,
    /// Physical format.
    pub physical_format: PhysicalFormat,
    /// Local cover image to upload.
    pub cover_path: Option<PathBuf>,
}

/// Book record returned by `createBook`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedBook {
    /// Remote identifier.
    pub id: String,
    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Title as stored.
    pub title: String,
}

/// Pre-signed upload target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignedUpload {
    /// URL the bytes are PUT to.
    pub url: String,
    /// Storage key of the uploaded object.
    pub key: String,
}

/// Fetch every book the profile is currently reading.
pub async fn currently_reading(gateway: &Gateway, credential: &Credential) -> Result<Vec<Book>> {
    let mut books: Vec<Book> = Vec::new();
    let mut previous_first: Option<String> = None;
    for _ in 0..MAX_PAGES {
        let variables = json!({
            "limit": PAGE_SIZE,
            "offset": books.len(),
            "readingStatus": "IS_READING",
            "profileId": credential.profile_id,
        });
        let outcome = gateway
            .send(&READING_LIST, variables, Some(&credential.token))
            .await?;
        let page: Vec<Book> = decode(&READING_LIST, expect_success(&READING_LIST, outcome)?)?;
        // A server that ignores `offset` keeps returning the first page.
        let first = page.first().map(|book| book.id.clone());
        if first.is_some() && first == previous_first {
            break;
        }
        let short_page = page.len() < PAGE_SIZE;
        books.extend(page);
        if short_page {
            break;
        }
        previous_first = first;
    }
    Ok(books)
}

/// Render a book as `<authors> - <title>[: subtitle]`, italicizing the title.
pub fn format_book(book: &Book, use_color: bool) -> String {
    let title = match book.subtitle.as_deref().map(str::trim) {
        Some(subtitle) if !subtitle.is_empty() => format!("{}: {subtitle}", book.title),
        _ => book.title.clone(),
    };
    format!(
        "{} - {}",
        format_authors(&book.authors),
        palette::fmt_title(&title, use_color)
    )
}

/// Join author names, falling back when there are none.
pub fn format_authors(authors: &[Author]) -> String {
    if authors.is_empty() {
        return UNKNOWN_AUTHOR.to_string();
    }
    authors
        .iter()
        .map(|author| author.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Upload a cover image and return its public URL.
///
/// Every failure along the way (reading the file, fetching the signed URL,
/// the upload itself) is printed and yields `None`.
pub async fn upload_cover(
    gateway: &Gateway,
    credential: &Credential,
    config: &Config,
    diagnostics: &Diagnostics,
    path: &Path,
) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            diagnostics.failure(format!(
                "Could not read cover image {}: {error}",
                display_path(path)
            ));
            return None;
        }
    };
    let content_type = content_type_for(path);

    let signed = match fetch_signed_upload(gateway, credential, content_type).await {
        Ok(signed) => signed,
        Err(error) => {
            diagnostics.failure(format!("Could not get an upload URL: {error}"));
            return None;
        }
    };

    match gateway.upload(&signed.url, bytes, content_type).await {
        Ok(UploadOutcome::Stored) => Some(config.cover_url(&signed.key)),
        Ok(UploadOutcome::Rejected { status, body }) => {
            diagnostics.failure(format!(
                "Cover upload failed with status code {status}\nResponse: {body}"
            ));
            None
        }
        Err(error) => {
            diagnostics.failure(format!("Cover upload failed: {error}"));
            None
        }
    }
}

/// Ask the service for a pre-signed upload target.
async fn fetch_signed_upload(
    gateway: &Gateway,
    credential: &Credential,
    content_type: &str,
) -> Result<SignedUpload> {
    let outcome = gateway
        .send(
            &SIGNED_UPLOAD_URL,
            json!({ "contentType": content_type }),
            Some(&credential.token),
        )
        .await?;
    decode(&SIGNED_UPLOAD_URL, expect_success(&SIGNED_UPLOAD_URL, outcome)?)
}

/// Create a book, uploading its cover first when one is given.
///
/// Returns `None` when the cover upload fails (no book is created) or when
/// the service reports application-level errors. A non-200 response to
/// `createBook` is an error.
pub async fn create_book(
    gateway: &Gateway,
    credential: &Credential,
    config: &Config,
    diagnostics: &Diagnostics,
    draft: &BookDraft,
) -> Result<Option<CreatedBook>> {
    let cover = match &draft.cover_path {
        Some(path) => {
            let Some(url) = upload_cover(gateway, credential, config, diagnostics, path).await
            else {
                return Ok(None);
            };
            Some(url)
        }
        None => None,
    };

    let variables = json!({
        "title": draft.title,
        "subtitle": draft.subtitle,
        "description": draft.description,
        "authors": draft.authors,
        "language": draft.language,
        "publishedDate": draft.published_date,
        "isbn10": draft.isbn10,
        "isbn13": draft.isbn13,
        "pageCount": draft.page_count,
        "publisher": draft.publisher,
        "mature": draft.mature,
        "physicalFormat": draft.physical_format,
        "cover": cover,
    });

    match gateway
        .send(&CREATE_BOOK, variables, Some(&credential.token))
        .await?
    {
        Outcome::Success(payload) => Ok(Some(decode(&CREATE_BOOK, payload)?)),
        Outcome::TransportFailure { status, body } => Err(Error::RequestFailed {
            operation: CREATE_BOOK.name.to_string(),
            status,
            body,
        }),
        Outcome::ApplicationFailure(errors) => {
            diagnostics.failure(format!(
                "Book creation failed: {}",
                error_messages(&errors).join("; ")
            ));
            Ok(None)
        }
    }
}

/// Guess an image content type from the file extension.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Turn a non-success outcome into an error.
pub(crate) fn expect_success(operation: &Operation, outcome: Outcome) -> Result<Value> {
    match outcome {
        Outcome::Success(payload) => Ok(payload),
        Outcome::TransportFailure { status, body } => Err(Error::RequestFailed {
            operation: operation.name.to_string(),
            status,
            body,
        }),
        Outcome::ApplicationFailure(errors) => Err(Error::RequestErrors {
            operation: operation.name.to_string(),
            messages: error_messages(&errors),
        }),
    }
}

/// Deserialize an operation payload.
pub(crate) fn decode<T: DeserializeOwned>(
    operation: &Operation,
    payload: Value,
) -> Result<T> {
    serde_json::from_value(payload).map_err(|error| Error::ResponseDecode {
        operation: operation.name.to_string(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, body_string_contains, method, path},
    };

    use super::{
        Author, Book, PhysicalFormat, content_type_for, create_book, currently_reading,
        format_authors, format_book,
    };
    use crate::{
        diagnostics::Diagnostics,
        error::Error,
        testutil::{config_for, credential, draft, gateway_for},
    };

    fn book(subtitle: Option<&str>, authors: &[&str]) -> Book {
        Book {
            id: "1".to_string(),
            slug: None,
            title: "The Dispossessed".to_string(),
            subtitle: subtitle.map(str::to_string),
            authors: authors
                .iter()
                .map(|name| Author {
                    name: (*name).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn formats_subtitle_inside_italics() {
        let rendered = format_book(&book(Some("An Ambiguous Utopia"), &["Ursula K. Le Guin"]), true);
        assert_eq!(
            rendered,
            "Ursula K. Le Guin - \x1b[3mThe Dispossessed: An Ambiguous Utopia\x1b[0m"
        );
    }

    #[test]
    fn omits_missing_or_blank_subtitle() {
        assert_eq!(
            format_book(&book(None, &["A", "B"]), true),
            "A, B - \x1b[3mThe Dispossessed\x1b[0m"
        );
        assert_eq!(
            format_book(&book(Some(""), &["A"]), false),
            "A - The Dispossessed"
        );
    }

    #[test]
    fn falls_back_to_unknown_author() {
        assert_eq!(format_authors(&[]), "Unknown Author");
        assert_eq!(
            format_book(&book(None, &[]), false),
            "Unknown Author - The Dispossessed"
        );
    }

    #[test]
    fn infers_content_types() {
        assert_eq!(content_type_for(Path::new("cover.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("cover.png")), "image/png");
        assert_eq!(content_type_for(Path::new("cover")), "application/octet-stream");
    }

    #[test]
    fn formats_serialize_in_schema_case() {
        assert_eq!(json!(PhysicalFormat::Ebook), json!("EBOOK"));
        assert_eq!(PhysicalFormat::Ebook.to_string(), "E-book");
    }

    #[tokio::test]
    async fn reading_list_pages_until_short_page() {
        let server = MockServer::start().await;
        let full_page: Vec<_> = (0..50)
            .map(|i| json!({"id": i.to_string(), "title": format!("Book {i}"), "authors": []}))
            .collect();
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"variables": {"offset": 0, "profileId": "profile-1"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"data": {"booksByReadingStateAndProfile": full_page}}),
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"variables": {"offset": 50}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"booksByReadingStateAndProfile": [
                    {"id": "x", "title": "Last", "subtitle": null, "authors": [{"id": "a", "name": "Ann"}]}
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let books = currently_reading(&gateway_for(&server), &credential())
            .await
            .expect("books");
        assert_eq!(books.len(), 51);
        assert_eq!(books[50].authors[0].name, "Ann");
    }

    #[tokio::test]
    async fn reading_list_stops_when_offset_is_ignored() {
        let server = MockServer::start().await;
        let full_page: Vec<_> = (0..50)
            .map(|i| json!({"id": i.to_string(), "title": format!("Book {i}"), "authors": []}))
            .collect();
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"data": {"booksByReadingStateAndProfile": full_page}}),
            ))
            .expect(2)
            .mount(&server)
            .await;

        let books = currently_reading(&gateway_for(&server), &credential())
            .await
            .expect("books");
        assert_eq!(books.len(), 50);
        assert_eq!(books[0].id, "0");
    }

    #[tokio::test]
    async fn reading_list_surfaces_transport_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let error = currently_reading(&gateway_for(&server), &credential())
            .await
            .expect_err("should fail");
        assert!(matches!(
            error,
            Error::RequestFailed { status: 503, .. }
        ));
    }

    #[tokio::test]
    async fn create_book_uses_cover_url_from_upload_key() {
        let server = MockServer::start().await;
        let dir = tempdir().expect("tempdir");
        let cover = dir.path().join("cover.png");
        fs::write(&cover, b"png bytes").expect("write cover");

        Mock::given(method("POST"))
            .and(body_string_contains("getSignedUploadUrl"))
            .and(body_partial_json(json!({"variables": {"contentType": "image/png"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"getSignedUploadUrl": {
                    "url": format!("{}/upload/covers/abc.png", server.uri()),
                    "key": "covers/abc.png"
                }}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/upload/covers/abc.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("mutation createBook"))
            .and(body_partial_json(json!({"variables": {
                "title": "The Dispossessed",
                "cover": "https://assets.example.test/covers/abc.png",
                "physicalFormat": "PAPERBACK"
            }})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"createBook": {"id": "b1", "slug": "the-dispossessed", "title": "The Dispossessed"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server, dir.path());
        let mut fields = draft();
        fields.cover_path = Some(cover);

        let created = create_book(
            &gateway_for(&server),
            &credential(),
            &config,
            &Diagnostics::default(),
            &fields,
        )
        .await
        .expect("create");
        assert_eq!(created.map(|book| book.id), Some("b1".to_string()));
    }

    #[tokio::test]
    async fn failed_signed_url_skips_book_creation() {
        let server = MockServer::start().await;
        let dir = tempdir().expect("tempdir");
        let cover = dir.path().join("cover.jpg");
        fs::write(&cover, b"jpg bytes").expect("write cover");

        Mock::given(method("POST"))
            .and(body_string_contains("getSignedUploadUrl"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"errors": [{"message": "forbidden"}]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("mutation createBook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut fields = draft();
        fields.cover_path = Some(cover);
        let created = create_book(
            &gateway_for(&server),
            &credential(),
            &config_for(&server, dir.path()),
            &Diagnostics::default(),
            &fields,
        )
        .await
        .expect("create");
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn failed_upload_skips_book_creation() {
        let server = MockServer::start().await;
        let dir = tempdir().expect("tempdir");
        let cover = dir.path().join("cover.jpg");
        fs::write(&cover, b"jpg bytes").expect("write cover");

        Mock::given(method("POST"))
            .and(body_string_contains("getSignedUploadUrl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"getSignedUploadUrl": {
                    "url": format!("{}/upload/covers/x.jpg", server.uri()),
                    "key": "covers/x.jpg"
                }}
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("expired signature"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("mutation createBook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut fields = draft();
        fields.cover_path = Some(cover);
        let created = create_book(
            &gateway_for(&server),
            &credential(),
            &config_for(&server, dir.path()),
            &Diagnostics::default(),
            &fields,
        )
        .await
        .expect("create");
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn unreachable_upload_target_skips_book_creation() {
        let server = MockServer::start().await;
        let dir = tempdir().expect("tempdir");
        let cover = dir.path().join("cover.jpg");
        fs::write(&cover, b"jpg bytes").expect("write cover");

        Mock::given(method("POST"))
            .and(body_string_contains("getSignedUploadUrl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"getSignedUploadUrl": {
                    "url": "http://127.0.0.1:1/upload/covers/x.jpg",
                    "key": "covers/x.jpg"
                }}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("mutation createBook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut fields = draft();
        fields.cover_path = Some(cover);
        let created = create_book(
            &gateway_for(&server),
            &credential(),
            &config_for(&server, dir.path()),
            &Diagnostics::default(),
            &fields,
        )
        .await
        .expect("connection failures are reported, not returned");
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn malformed_signed_upload_skips_book_creation() {
        let server = MockServer::start().await;
        let dir = tempdir().expect("tempdir");
        let cover = dir.path().join("cover.jpg");
        fs::write(&cover, b"jpg bytes").expect("write cover");

        Mock::given(method("POST"))
            .and(body_string_contains("getSignedUploadUrl"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"getSignedUploadUrl": {"url": 7}}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("mutation createBook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut fields = draft();
        fields.cover_path = Some(cover);
        let created = create_book(
            &gateway_for(&server),
            &credential(),
            &config_for(&server, dir.path()),
            &Diagnostics::default(),
            &fields,
        )
        .await
        .expect("decode failures are reported, not returned");
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn unreadable_cover_skips_all_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempdir().expect("tempdir");
        let mut fields = draft();
        fields.cover_path = Some(dir.path().join("missing.png"));
        let created = create_book(
            &gateway_for(&server),
            &credential(),
            &config_for(&server, dir.path()),
            &Diagnostics::default(),
            &fields,
        )
        .await
        .expect("create");
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn application_errors_from_create_book_yield_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("mutation createBook"))
            .and(body_partial_json(json!({"variables": {"cover": null}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"errors": [{"message": "duplicate isbn"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().expect("tempdir");
        let created = create_book(
            &gateway_for(&server),
            &credential(),
            &config_for(&server, dir.path()),
            &Diagnostics::default(),
            &draft(),
        )
        .await
        .expect("create");
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn create_book_transport_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("mutation createBook"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = tempdir().expect("tempdir");
        let error = create_book(
            &gateway_for(&server),
            &credential(),
            &config_for(&server, dir.path()),
            &Diagnostics::default(),
            &draft(),
        )
        .await
        .expect_err("should fail");
        assert!(matches!(
            error,
            Error::RequestFailed { status: 500, .. }
        ));
    }
}
