use std::collections::HashMap;

use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub bytes: Bytes,
}

/// Text fields and uploaded files of a submitted HTML form, in submission order.
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl FormSubmission {
    pub fn files_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a UploadedFile> {
        self.files.iter().filter(move |file| file.field == field)
    }

    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut submission = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;

                    // untouched file input
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }

                    submission.files.push(UploadedFile {
                        field: name,
                        file_name,
                        bytes,
                    });
                }
                None => {
                    let value = field.text().await?;
                    submission.fields.insert(name, value);
                }
            }
        }

        Ok(submission)
    }
}

impl<S> FromRequest<S> for FormSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::rejected_body(e.status(), e.body_text()))?;
            return Self::from_multipart(multipart).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::rejected_body(e.status(), e.body_text()))?;
            return Ok(Self {
                fields: pairs.into_iter().collect(),
                files: Vec::new(),
            });
        }

        Err(AppError::BadRequest(format!(
            "Unsupported content type: {}",
            content_type
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    const BOUNDARY: &str = "catalogboundary";

    fn multipart_request(body: String) -> Request {
        Request::builder()
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        )
    }

    fn file_part(name: &str, file_name: &str, content: &str) -> String {
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n{}\r\n",
            BOUNDARY, name, file_name, content
        )
    }

    #[tokio::test]
    async fn splits_text_fields_and_files() {
        let body = [
            text_part("name", "Widget"),
            file_part("products", "a.png", "first"),
            text_part("price", "19.99"),
            file_part("products", "b.png", "second"),
        ]
        .concat()
            + &format!("--{}--\r\n", BOUNDARY);

        let submission = FormSubmission::from_request(multipart_request(body), &())
            .await
            .unwrap();

        assert_eq!(submission.fields["name"], "Widget");
        assert_eq!(submission.fields["price"], "19.99");

        let names: Vec<_> = submission
            .files_for("products")
            .map(|file| file.file_name.as_str())
            .collect();
        assert_eq!(names, ["a.png", "b.png"]);
        assert_eq!(&submission.files[1].bytes[..], b"second");
    }

    #[tokio::test]
    async fn skips_untouched_file_input() {
        let body = [text_part("name", "Widget"), file_part("products", "", "")].concat()
            + &format!("--{}--\r\n", BOUNDARY);

        let submission = FormSubmission::from_request(multipart_request(body), &())
            .await
            .unwrap();

        assert!(submission.files.is_empty());
    }

    #[tokio::test]
    async fn accepts_urlencoded_forms() {
        let req = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=Desk+Lamp&price=12.50&description=Bright"))
            .unwrap();

        let submission = FormSubmission::from_request(req, &()).await.unwrap();

        assert_eq!(submission.fields["name"], "Desk Lamp");
        assert!(submission.files.is_empty());
    }

    #[tokio::test]
    async fn rejects_other_bodies() {
        let req = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let err = FormSubmission::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
