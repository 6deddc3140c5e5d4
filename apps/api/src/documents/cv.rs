//! CV document: profile banner followed by one banded section per non-empty part.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::documents::{filename_slug, filename_timestamp, join_present, PreparedDocument};
use crate::layout::{ContentBlock, ImageData, PageGeometry, Rgb, TextStyle};

const DEFAULT_NAME: &str = "Your Name";
const DEFAULT_TITLE: &str = "Professional Title";
const DEFAULT_SECTION_TITLE: &str = "Custom Section";
/// End date shown for a job that has started but not ended.
const PRESENT: &str = "Present";
const LINK_COLOR: Rgb = Rgb(59, 130, 246);
const DATE_COLOR: Rgb = Rgb(100, 100, 100);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvPayload {
    pub personal: PersonalInfo,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub custom_sections: Vec<CustomSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub country: String,
    pub photo_url: Option<String>,
}

impl PersonalInfo {
    pub fn full_name(&self) -> String {
        join_present([self.first_name.as_str(), self.last_name.as_str()], " ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(alias = "title")]
    pub job_title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: String,
    #[serde(alias = "field")]
    pub field_of_study: String,
    pub school: String,
    #[serde(alias = "endDate")]
    pub graduation_date: String,
    pub description: String,
}

/// Skills arrive either as plain strings or as `{ "name": ... }` objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skill {
    Name(String),
    Named { name: String },
}

impl Skill {
    pub fn name(&self) -> &str {
        match self {
            Skill::Name(name) | Skill::Named { name } => name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(alias = "name")]
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSection {
    pub title: String,
    pub content: String,
}

impl CvPayload {
    pub fn photo_url(&self) -> Option<&str> {
        self.personal
            .photo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Builds the CV. `photo` is the already-fetched profile image, if any.
    pub fn prepare(
        &self,
        photo: Option<ImageData>,
        geometry: PageGeometry,
        now: DateTime<Utc>,
    ) -> PreparedDocument {
        let name = self.personal.full_name();
        let slug = filename_slug(&name);
        let slug = if slug.is_empty() { "CV".to_string() } else { slug };

        PreparedDocument {
            title: if name.is_empty() {
                "CV".to_string()
            } else {
                format!("{name} - CV")
            },
            filename: format!("CV_{slug}_{}.pdf", filename_timestamp(now)),
            geometry,
            blocks: cv_blocks(self, photo),
        }
    }
}

fn band(title: &str) -> ContentBlock {
    ContentBlock::SectionBand {
        title: title.to_string(),
        fill: None,
    }
}

fn body(text: &str) -> ContentBlock {
    ContentBlock::paragraph(text.trim(), TextStyle::normal(10.0))
}

fn date_line(text: String) -> ContentBlock {
    ContentBlock::paragraph(text, TextStyle::normal(9.0).with_color(DATE_COLOR))
}

pub fn cv_blocks(cv: &CvPayload, photo: Option<ImageData>) -> Vec<ContentBlock> {
    let personal = &cv.personal;
    let name = personal.full_name();
    let contact = join_present(
        [
            personal.email.as_str(),
            personal.phone.as_str(),
            personal.location.as_str(),
            personal.country.as_str(),
        ],
        " | ",
    );

    let mut blocks = vec![ContentBlock::Banner {
        name: if name.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            name
        },
        subtitle: if personal.job_title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            personal.job_title.trim().to_string()
        },
        contact,
        photo,
    }];

    if !cv.summary.trim().is_empty() {
        blocks.push(band("Professional Summary"));
        blocks.push(body(&cv.summary));
    }

    if !cv.experience.is_empty() {
        blocks.push(band("Work Experience"));
        for job in &cv.experience {
            let title = match (job.job_title.trim(), job.company.trim()) {
                ("", company) => company.to_string(),
                (title, "") => title.to_string(),
                (title, company) => format!("{title} at {company}"),
            };
            if !title.is_empty() {
                blocks.push(ContentBlock::heading(title, TextStyle::bold(12.0)));
            }
            let end_date = match (job.start_date.trim(), job.end_date.trim()) {
                (start, "") if !start.is_empty() => PRESENT,
                (_, end) => end,
            };
            let dates = join_present([job.start_date.as_str(), end_date], " - ");
            let meta = join_present([dates.as_str(), job.location.as_str()], " | ");
            if !meta.is_empty() {
                blocks.push(date_line(meta));
            }
            if !job.description.trim().is_empty() {
                blocks.push(body(&job.description));
            }
            blocks.push(ContentBlock::Spacer(3.0));
        }
    }

    if !cv.education.is_empty() {
        blocks.push(band("Education"));
        for entry in &cv.education {
            let title = match (entry.degree.trim(), entry.field_of_study.trim()) {
                ("", field) => field.to_string(),
                (degree, "") => degree.to_string(),
                (degree, field) => format!("{degree} in {field}"),
            };
            if !title.is_empty() {
                blocks.push(ContentBlock::heading(title, TextStyle::bold(12.0)));
            }
            let meta = join_present(
                [entry.school.as_str(), entry.graduation_date.as_str()],
                " | ",
            );
            if !meta.is_empty() {
                blocks.push(date_line(meta));
            }
            if !entry.description.trim().is_empty() {
                blocks.push(body(&entry.description));
            }
            blocks.push(ContentBlock::Spacer(3.0));
        }
    }

    let skills = join_present(cv.skills.iter().map(Skill::name), " • ");
    if !skills.is_empty() {
        blocks.push(band("Skills"));
        blocks.push(body(&skills));
    }

    let links: Vec<&Link> = cv.links.iter().filter(|l| !l.url.trim().is_empty()).collect();
    if !links.is_empty() {
        blocks.push(band("Links"));
        for link in links {
            let text = if link.label.trim().is_empty() {
                link.url.trim().to_string()
            } else {
                format!("{}: {}", link.label.trim(), link.url.trim())
            };
            blocks.push(ContentBlock::paragraph(
                text,
                TextStyle::normal(10.0).with_color(LINK_COLOR),
            ));
        }
    }

    for section in &cv.custom_sections {
        if section.title.trim().is_empty() && section.content.trim().is_empty() {
            continue;
        }
        let title = match section.title.trim() {
            "" => DEFAULT_SECTION_TITLE,
            title => title,
        };
        blocks.push(band(title));
        if !section.content.trim().is_empty() {
            blocks.push(body(&section.content));
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 5).unwrap()
    }

    fn make_cv(value: serde_json::Value) -> CvPayload {
        serde_json::from_value(value).unwrap()
    }

    fn band_titles(blocks: &[ContentBlock]) -> Vec<&str> {
        blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::SectionBand { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    fn full_cv() -> CvPayload {
        make_cv(json!({
            "personal": {
                "firstName": "Ada",
                "lastName": "Lovelace",
                "jobTitle": "Analyst",
                "email": "ada@example.com",
                "phone": "",
                "location": "London",
                "photoUrl": "https://example.com/ada.jpg"
            },
            "summary": "Mathematician with a taste for engines.",
            "experience": [{
                "title": "Analyst",
                "company": "Analytical Engine Co",
                "startDate": "1842",
                "endDate": "1843",
                "description": "Wrote the first published algorithm."
            }],
            "education": [{ "degree": "Private tutoring", "field": "Mathematics" }],
            "skills": ["Mathematics", { "name": "Translation" }],
            "links": [{ "name": "Notes", "url": "https://example.com/notes" }],
            "customSections": [{ "title": "Publications", "content": "Sketch of the Analytical Engine" }]
        }))
    }

    #[test]
    fn test_sections_appear_in_order() {
        let blocks = cv_blocks(&full_cv(), None);
        assert_eq!(
            band_titles(&blocks),
            vec![
                "Professional Summary",
                "Work Experience",
                "Education",
                "Skills",
                "Links",
                "Publications"
            ]
        );
        assert_eq!(blocks[0].kind(), "banner");
    }

    #[test]
    fn test_banner_contact_skips_blank_fields() {
        let blocks = cv_blocks(&full_cv(), None);
        match &blocks[0] {
            ContentBlock::Banner { name, contact, subtitle, .. } => {
                assert_eq!(name, "Ada Lovelace");
                assert_eq!(subtitle, "Analyst");
                assert_eq!(contact, "ada@example.com | London");
            }
            other => panic!("expected banner, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_personal_uses_placeholders() {
        let blocks = cv_blocks(&make_cv(json!({ "personal": {} })), None);
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            ContentBlock::Banner { name, subtitle, .. } => {
                assert_eq!(name, DEFAULT_NAME);
                assert_eq!(subtitle, DEFAULT_TITLE);
            }
            other => panic!("expected banner, got {other:?}"),
        }
    }

    #[test]
    fn test_aliases_and_mixed_skills() {
        let cv = full_cv();
        assert_eq!(cv.experience[0].job_title, "Analyst");
        assert_eq!(cv.education[0].field_of_study, "Mathematics");
        assert_eq!(cv.links[0].label, "Notes");
        let blocks = cv_blocks(&cv, None);
        let has_skills = blocks.iter().any(|b| {
            matches!(b, ContentBlock::Paragraph { text, .. } if text == "Mathematics • Translation")
        });
        assert!(has_skills);
    }

    #[test]
    fn test_experience_heading_and_dates() {
        let blocks = cv_blocks(&full_cv(), None);
        let texts: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Heading { text, .. } | ContentBlock::Paragraph { text, .. } => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"Analyst at Analytical Engine Co"));
        assert!(texts.contains(&"1842 - 1843"));
        assert!(texts.contains(&"Private tutoring in Mathematics"));
    }

    #[test]
    fn test_open_ended_job_shows_present() {
        let cv = make_cv(json!({
            "personal": {},
            "experience": [
                { "title": "Engineer", "company": "Acme", "startDate": "2021" },
                { "title": "Intern", "company": "Acme" }
            ]
        }));
        let blocks = cv_blocks(&cv, None);
        let paragraphs: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Paragraph { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(paragraphs, vec!["2021 - Present"]);
    }

    #[test]
    fn test_untitled_custom_section_gets_default_title() {
        let cv = make_cv(json!({
            "personal": {},
            "customSections": [{ "title": "  ", "content": "Volunteer work" }]
        }));
        let blocks = cv_blocks(&cv, None);
        assert_eq!(band_titles(&blocks), vec![DEFAULT_SECTION_TITLE]);
    }

    #[test]
    fn test_photo_is_carried_into_banner() {
        let photo = ImageData(Bytes::from_static(b"jpeg"));
        let blocks = cv_blocks(&full_cv(), Some(photo.clone()));
        assert!(matches!(&blocks[0], ContentBlock::Banner { photo: Some(p), .. } if *p == photo));
    }

    #[test]
    fn test_filename_and_title() {
        let doc = full_cv().prepare(None, PageGeometry::a4(20.0).unwrap(), now());
        assert_eq!(doc.filename, "CV_Ada_Lovelace_20261018-143005.pdf");
        assert_eq!(doc.title, "Ada Lovelace - CV");
    }

    #[test]
    fn test_blank_photo_url_is_ignored() {
        let cv = make_cv(json!({ "personal": { "photoUrl": "   " } }));
        assert_eq!(cv.photo_url(), None);
        assert_eq!(full_cv().photo_url(), Some("https://example.com/ada.jpg"));
    }

    #[test]
    fn test_missing_personal_is_rejected() {
        let result: Result<CvPayload, _> = serde_json::from_value(json!({ "summary": "x" }));
        assert!(result.is_err());
    }
}
