use std::fmt::Write as _;
use std::time::Duration;

use chrono::{Datelike, Utc};

use super::page::Page;
use crate::admissions::{
    ApplicantDetails, ApplicantField, ApplicationRecord, CertificateKind, LoginError, NoticeTone,
    NoticeView, SubmitControl, CERTIFICATE_FIELD, COURSE_CATALOG,
};

const STYLE: &str = "body{font-family:sans-serif;margin:0;background:#f4f7fb}\
nav{display:flex;gap:1rem;padding:1rem;background:#0b3d91}nav a{color:#fff;text-decoration:none}\
main{max-width:52rem;margin:2rem auto;background:#fff;padding:2rem;border-radius:1rem}\
label{display:block;font-weight:600;margin:.75rem 0}input,select,textarea{display:block;width:100%;margin-top:.25rem;padding:.5rem}\
.error{color:#c53030}.notice{position:fixed;inset:0;display:flex;align-items:center;justify-content:center;background:rgba(0,0,0,.5)}\
.notice>div{background:#fff;padding:1.5rem;border-radius:.5rem}\
@keyframes notice-expire{to{opacity:0;visibility:hidden}}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #ccc;padding:.4rem;text-align:left}";

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Wraps `body` in the shared header, navigation, and footer.
pub fn layout(page: Page, body: &str) -> String {
    let mut html = String::new();
    write!(
        html,
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{} | Institute</title><style>{STYLE}</style></head><body><nav>",
        escape(page.title())
    )
    .expect("write head");

    for link in Page::ALL.into_iter().filter(|link| link.in_navigation()) {
        let current = if link == page {
            " aria-current=\"page\""
        } else {
            ""
        };
        write!(
            html,
            "<a href=\"{}\"{current}>{}</a>",
            link.path(),
            escape(link.title())
        )
        .expect("write nav link");
    }

    write!(
        html,
        "</nav><main>{body}</main><footer><p>&copy; {} Institute</p></footer></body></html>",
        Utc::now().year()
    )
    .expect("write footer");
    html
}

/// Informational pages with no form state.
pub fn static_page(page: Page) -> String {
    let body = match page {
        Page::Home => "<h1>Welcome</h1><p>Practical health, computing, and technical \
                       programmes with flexible intakes throughout the year.</p>\
                       <p><a href=\"/applyNow\">Start your application</a></p>"
            .to_string(),
        Page::About => "<h1>About Us</h1><p>We train caregivers, health records officers, \
                        theatre technicians, and ICT professionals through hands-on \
                        instruction and supervised placements.</p>"
            .to_string(),
        Page::Courses => {
            let mut body = String::from("<h1>Courses</h1><ul>");
            for course in COURSE_CATALOG {
                write!(body, "<li>{}</li>", escape(course)).expect("write course");
            }
            body.push_str("</ul>");
            body
        }
        Page::Training => "<h1>Training</h1><p>Classes combine theory sessions with \
                           laboratory and field practice under qualified instructors.</p>"
            .to_string(),
        Page::Blog => "<h1>Blog</h1><p>News, intake dates, and student stories.</p>".to_string(),
        Page::FeeStructure => "<h1>Fee Structure</h1><p>Tuition, examination, and \
                               registration fees are published per intake. Contact the \
                               admissions office for the current schedule.</p>"
            .to_string(),
        Page::ApplyNow | Page::Login | Page::AdminPage => String::new(),
    };
    layout(page, &body)
}

pub fn not_found_page(path: &str) -> String {
    let body = format!(
        "<h1>Page not found</h1><p>No page lives at <code>{}</code>.</p><p><a href=\"/\">Back home</a></p>",
        escape(path)
    );
    layout(Page::Home, &body)
}

/// Everything the application page shows besides the static copy.
#[derive(Debug, Clone, Default)]
pub struct ApplyView<'a> {
    pub values: Option<&'a ApplicantDetails>,
    pub notice: Option<NoticeView>,
    pub notice_ttl: Duration,
    /// Local validation message rendered above the submit button.
    pub problem: Option<String>,
}

fn text_input(html: &mut String, field: ApplicantField, kind: &str, value: &str) {
    write!(
        html,
        "<label>{}:<input type=\"{kind}\" name=\"{}\" value=\"{}\" required></label>",
        escape(field.label()),
        field.wire_name(),
        escape(value)
    )
    .expect("write input");
}

pub fn apply_page(view: &ApplyView<'_>) -> String {
    let empty = ApplicantDetails::default();
    let values = view.values.unwrap_or(&empty);
    let mut body = String::from(
        "<h1>APPLICATION FORM</h1><p>You are about to start your online application. \
         We are excited to accompany you on your academic journey.</p>\
         <form method=\"post\" action=\"/applyNow\" enctype=\"multipart/form-data\">",
    );

    text_input(&mut body, ApplicantField::Name, "text", &values.name);
    text_input(&mut body, ApplicantField::IdNumber, "text", &values.id_number);
    text_input(&mut body, ApplicantField::Email, "email", &values.email);
    text_input(&mut body, ApplicantField::Phone, "tel", &values.phone);

    write!(
        body,
        "<label>{}:<select name=\"{}\" required><option value=\"\" disabled{}>Select a course</option>",
        escape(ApplicantField::Course.label()),
        ApplicantField::Course.wire_name(),
        if values.course.is_empty() { " selected" } else { "" }
    )
    .expect("write select");
    for course in COURSE_CATALOG {
        let selected = if values.course == course {
            " selected"
        } else {
            ""
        };
        write!(
            body,
            "<option value=\"{0}\"{selected}>{0}</option>",
            escape(course)
        )
        .expect("write option");
    }
    body.push_str("</select></label>");

    write!(
        body,
        "<label>Scanned Certificate, Birth, ID front &amp; Back:\
         <input type=\"file\" name=\"{CERTIFICATE_FIELD}\" accept=\"{}\" required></label>",
        CertificateKind::ACCEPT
    )
    .expect("write file input");

    write!(
        body,
        "<label>{}:<textarea name=\"{}\" rows=\"4\" required>{}</textarea></label>",
        escape(ApplicantField::BriefInformation.label()),
        ApplicantField::BriefInformation.wire_name(),
        escape(&values.brief_information)
    )
    .expect("write textarea");

    if let Some(problem) = &view.problem {
        write!(body, "<p class=\"error\" role=\"alert\">{}</p>", escape(problem))
            .expect("write problem");
    }
    body.push_str("<button type=\"submit\">Submit</button></form>");

    if let Some(notice) = &view.notice {
        let mark = match notice.tone {
            NoticeTone::Success => "&#10003;",
            NoticeTone::Failure => "&#9888;",
        };
        write!(
            body,
            "<div class=\"notice\" role=\"status\" style=\"animation:notice-expire 0s linear {}ms forwards\">\
             <div><span>{mark}</span><p>{}</p>\
             <button type=\"button\" onclick=\"this.closest('.notice').remove()\">Close</button></div></div>",
            view.notice_ttl.as_millis(),
            escape(&notice.message)
        )
        .expect("write notice");
    }

    layout(Page::ApplyNow, &body)
}

pub fn login_page(email: &str, error: Option<&LoginError>, control: &SubmitControl) -> String {
    let mut body = String::from("<h1>Login</h1><form method=\"post\" action=\"/login\">");
    write!(
        body,
        "<label>Email<input type=\"email\" name=\"email\" value=\"{}\" placeholder=\"Enter your email\"></label>\
         <label>Password<input type=\"password\" name=\"password\" placeholder=\"Enter your password\"></label>",
        escape(email)
    )
    .expect("write credentials");

    if let Some(error) = error {
        write!(
            body,
            "<p class=\"error\" role=\"alert\">{}</p>",
            escape(&error.to_string())
        )
        .expect("write login error");
    }

    let disabled = if control.is_disabled() {
        " disabled"
    } else {
        ""
    };
    write!(
        body,
        "<button type=\"submit\"{disabled}>{}</button></form>",
        control.label()
    )
    .expect("write button");

    layout(Page::Login, &body)
}

pub fn admin_page(records: &[ApplicationRecord]) -> String {
    let mut body = format!("<h1>Applications</h1><p>{} received.</p>", records.len());
    if records.is_empty() {
        body.push_str("<p>No applications yet.</p>");
        return layout(Page::AdminPage, &body);
    }

    body.push_str("<table><thead><tr>");
    for field in ApplicantField::ALL {
        write!(body, "<th>{}</th>", escape(field.label())).expect("write header");
    }
    body.push_str("</tr></thead><tbody>");
    for record in records {
        body.push_str("<tr>");
        for field in ApplicantField::ALL {
            let cell = record.field(field.wire_name()).unwrap_or_default();
            write!(body, "<td>{}</td>", escape(&cell)).expect("write cell");
        }
        body.push_str("</tr>");
    }
    body.push_str("</tbody></table>");

    layout(Page::AdminPage, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(
            escape("<script>alert(\"x\")</script> & 'y'"),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
    }

    #[test]
    fn layout_links_every_public_page() {
        let html = layout(Page::About, "<p>body</p>");
        for page in Page::ALL.into_iter().filter(|page| page.in_navigation()) {
            assert!(html.contains(&format!("href=\"{}\"", page.path())));
        }
        assert!(!html.contains("href=\"/adminPage\""));
        assert!(html.contains("<a href=\"/about\" aria-current=\"page\">"));
    }

    #[test]
    fn apply_page_keeps_values_and_renders_notice() {
        let values = ApplicantDetails {
            name: "O'Neil <Jr>".to_string(),
            course: "Digital Marketing".to_string(),
            ..ApplicantDetails::default()
        };
        let view = ApplyView {
            values: Some(&values),
            notice: Some(NoticeView {
                message: "An error occurred while submitting the form.".to_string(),
                tone: NoticeTone::Failure,
            }),
            notice_ttl: Duration::from_secs(5),
            problem: None,
        };

        let html = apply_page(&view);
        assert!(html.contains("value=\"O&#39;Neil &lt;Jr&gt;\""));
        assert!(html.contains("<option value=\"Digital Marketing\" selected>"));
        assert!(html.contains("accept=\".pdf,.jpg,.jpeg,.png\""));
        assert!(html.contains("An error occurred while submitting the form."));
        assert!(html.contains("5000ms"));
    }

    #[test]
    fn login_page_shows_error_and_idle_button() {
        let html = login_page(
            "registrar@example.org",
            Some(&LoginError::InvalidCredentials),
            &SubmitControl::default(),
        );
        assert!(html.contains("Invalid email or password. Please try again."));
        assert!(html.contains("<button type=\"submit\">Log In</button>"));
        assert!(!html.contains("name=\"password\" value"));
    }

    #[test]
    fn admin_page_tabulates_known_fields() {
        let records = vec![ApplicationRecord(json!({
            "name": "Amina Wanjiru",
            "idNumber": 32456789,
            "course": "Caregiver Certificate",
            "certification": { "path": "uploads/a.pdf" }
        }))];
        let html = admin_page(&records);
        assert!(html.contains("<td>Amina Wanjiru</td>"));
        assert!(html.contains("<td>32456789</td>"));
        assert!(html.contains("1 received."));

        assert!(admin_page(&[]).contains("No applications yet."));
    }
}
