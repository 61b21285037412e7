use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Programmes an applicant can select on the application form.
pub const COURSE_CATALOG: [&str; 26] = [
    "Pre-University course",
    "Caregiver Certificate",
    "Diploma In Kenya Registered Community Health Nursing",
    "Certificate in Healthcare Support Assistant",
    "Certificate In Perioperative Theatre Technology",
    "Diploma In Perioperative Theatre Technology",
    "Certificate in Health Records & IT",
    "Diploma in Health Records & IT",
    "Bridging Courses for Biology",
    "Bridging Courses for Chemistry",
    "Bridging Courses for Mathematics",
    "Computer Packages (10 Packages)",
    "Graphic Design (Photoshop, Illustrator, In-design, Pagemaker, CoreDraw)",
    "Computer Networking",
    "Webdesign (HTML, CSS, Javascript, PHP)",
    "Computer Programming (Pascal, C, C++, Visual Basic, Java, Python)",
    "Computerized Accounting Packages (QuickBooks, Sage, Tally, Pastel)",
    "Digital Marketing",
    "Mobile Phone Repair",
    "Computer Aided Design - CAD (AutoCAD, ArchiCAD)",
    "Advanced Excel",
    "Computer Repair & Maintenance",
    "CCTV installation",
    "CCTV Management",
    "Information Management",
    "Library Archives",
];

pub fn is_offered(course: &str) -> bool {
    COURSE_CATALOG.contains(&course)
}

/// Text inputs on the application form, in the order they are sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicantField {
    Name,
    IdNumber,
    Email,
    Phone,
    Course,
    BriefInformation,
}

impl ApplicantField {
    pub const ALL: [ApplicantField; 6] = [
        ApplicantField::Name,
        ApplicantField::IdNumber,
        ApplicantField::Email,
        ApplicantField::Phone,
        ApplicantField::Course,
        ApplicantField::BriefInformation,
    ];

    /// Multipart field name expected by the backend.
    pub fn wire_name(self) -> &'static str {
        match self {
            ApplicantField::Name => "name",
            ApplicantField::IdNumber => "idNumber",
            ApplicantField::Email => "email",
            ApplicantField::Phone => "phone",
            ApplicantField::Course => "course",
            ApplicantField::BriefInformation => "briefInformation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ApplicantField::Name => "Name",
            ApplicantField::IdNumber => "ID Number",
            ApplicantField::Email => "Email",
            ApplicantField::Phone => "Phone Number",
            ApplicantField::Course => "Course to Attend",
            ApplicantField::BriefInformation => "Brief Information of Course You Intend to Take",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.wire_name() == name)
    }
}

/// Applicant-entered text, serialized with the backend's camelCase keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetails {
    pub name: String,
    pub id_number: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub brief_information: String,
}

impl ApplicantDetails {
    pub fn get(&self, field: ApplicantField) -> &str {
        match field {
            ApplicantField::Name => &self.name,
            ApplicantField::IdNumber => &self.id_number,
            ApplicantField::Email => &self.email,
            ApplicantField::Phone => &self.phone,
            ApplicantField::Course => &self.course,
            ApplicantField::BriefInformation => &self.brief_information,
        }
    }

    pub fn set(&mut self, field: ApplicantField, value: String) {
        let slot = match field {
            ApplicantField::Name => &mut self.name,
            ApplicantField::IdNumber => &mut self.id_number,
            ApplicantField::Email => &mut self.email,
            ApplicantField::Phone => &mut self.phone,
            ApplicantField::Course => &mut self.course,
            ApplicantField::BriefInformation => &mut self.brief_information,
        };
        *slot = value;
    }

    /// First field left empty, in form order. Whitespace counts as a value.
    pub fn first_missing(&self) -> Option<ApplicantField> {
        ApplicantField::ALL
            .into_iter()
            .find(|field| self.get(*field).is_empty())
    }

    pub fn text_fields(&self) -> impl Iterator<Item = (ApplicantField, &str)> + '_ {
        ApplicantField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }
}

/// File formats accepted for the scanned certificate upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateKind {
    Pdf,
    Jpeg,
    Png,
}

impl CertificateKind {
    /// Value for the file input's `accept` attribute.
    pub const ACCEPT: &'static str = ".pdf,.jpg,.jpeg,.png";

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn content_type(self) -> mime::Mime {
        match self {
            CertificateKind::Pdf => mime::APPLICATION_PDF,
            CertificateKind::Jpeg => mime::IMAGE_JPEG,
            CertificateKind::Png => mime::IMAGE_PNG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("certificate '{file_name}' must be a PDF, JPEG, or PNG file")]
pub struct UnsupportedCertificate {
    pub file_name: String,
}

/// Uploaded certificate scan. Only allow-listed extensions can be constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    file_name: String,
    kind: CertificateKind,
    bytes: Bytes,
}

impl Certificate {
    pub fn new(
        file_name: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Result<Self, UnsupportedCertificate> {
        let file_name = file_name.into();
        match CertificateKind::from_file_name(&file_name) {
            Some(kind) => Ok(Self {
                file_name,
                kind,
                bytes: bytes.into(),
            }),
            None => Err(UnsupportedCertificate { file_name }),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> CertificateKind {
        self.kind
    }

    pub fn content_type(&self) -> mime::Mime {
        self.kind.content_type()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("file_name", &self.file_name)
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A complete application ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationSubmission {
    pub details: ApplicantDetails,
    pub certificate: Certificate,
}

/// Administrator login input. The password never appears in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One entry of the backend's application listing. The shape is owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationRecord(pub Value);

impl ApplicationRecord {
    /// Display text for a top-level field; scalars only.
    pub fn field(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }
}

/// Listing bodies that are not JSON arrays are treated as an empty listing.
pub fn records_from_listing(body: Value) -> Vec<ApplicationRecord> {
    match body {
        Value::Array(items) => items.into_iter().map(ApplicationRecord).collect(),
        _ => Vec::new(),
    }
}
