//! Message rendering. Wraps subject + body fragment in the association's
//! branded HTML shell.
//!
//! Output is a pure function of (subject, body, options) except for the
//! footer year.

use crate::domain::RenderedMessage;
use chrono::Datelike;

const ORG_NAME: &str = "Calgary Basketball Officials Association";
const ORG_TAGLINE: &str = "Excellence in Basketball Officiating";
const ORG_LOCATION: &str = "Calgary, Alberta, Canada";
const SITE_URL: &str = "https://cboa.ca";
const LOGO_URL: &str = "https://i.imgur.com/BQe360J.png";

const OUTER_BG: &str = "#f5f5f5";
const OUTER_BG_PREVIEW: &str = "#1f2937";

/// Who the message is addressed to. Controls footer links and the
/// "why am I receiving this" line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplateAudience {
    #[default]
    Members,
    /// Non-members, e.g. booking requesters.
    External,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub audience: TemplateAudience,
    /// Dark outer background, for on-screen previews.
    pub preview: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MessageRenderer {
    options: RenderOptions,
}

impl MessageRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render with the current calendar year in the footer.
    pub fn render(&self, subject: &str, body_fragment: &str) -> RenderedMessage {
        self.render_for_year(subject, body_fragment, chrono::Local::now().year())
    }

    pub fn render_for_year(&self, subject: &str, body_fragment: &str, year: i32) -> RenderedMessage {
        let outer_bg = if self.options.preview {
            OUTER_BG_PREVIEW
        } else {
            OUTER_BG
        };
        let title = escape_html(subject);

        let mut html = String::with_capacity(HEAD_STYLE.len() + body_fragment.len() + 4096);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"UTF-8\">\n");
        html.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("  <meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\">\n");
        html.push_str("  <meta name=\"color-scheme\" content=\"light\">\n");
        html.push_str("  <meta name=\"supported-color-schemes\" content=\"light\">\n");
        html.push_str(&format!("  <title>{title}</title>\n"));
        html.push_str(&HEAD_STYLE.replace("__OUTER_BG__", outer_bg));
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!(
            "  <div style=\"display:none;font-size:1px;color:#ffffff;line-height:1px;max-height:0px;max-width:0px;opacity:0;overflow:hidden;\">{title}</div>\n"
        ));
        html.push_str(&format!(
            "  <table role=\"presentation\" cellspacing=\"0\" cellpadding=\"0\" border=\"0\" width=\"100%\" style=\"background-color: {outer_bg};\">\n    <tr>\n      <td style=\"padding: 20px 10px;\">\n"
        ));
        html.push_str("        <table role=\"presentation\" class=\"email-container\" cellspacing=\"0\" cellpadding=\"0\" border=\"0\" style=\"max-width: 600px; width: 100%; margin: 0 auto; background-color: #ffffff;\" align=\"center\">\n");
        html.push_str(&header());
        html.push_str("          <tr>\n            <td class=\"email-content\" style=\"padding: 30px 20px; color: #333333; background-color: #ffffff; font-size: 16px; line-height: 1.6;\">\n");
        html.push_str(body_fragment);
        html.push_str("\n            </td>\n          </tr>\n");
        html.push_str(&footer(self.options.audience, year));
        html.push_str("        </table>\n      </td>\n    </tr>\n  </table>\n</body>\n</html>");

        RenderedMessage {
            subject: subject.to_string(),
            html,
        }
    }
}

fn header() -> String {
    format!(
        "          <tr>\n            <td style=\"background-color: #1f2937; padding: 24px 20px; border-bottom: 3px solid #F97316; text-align: center;\">\n              <img src=\"{LOGO_URL}\" alt=\"CBOA Logo\" style=\"max-width: 70px; height: auto; display: inline-block; margin-bottom: 12px;\">\n              <h1 style=\"color: #ffffff; margin: 0 0 4px 0; font-size: 18px; font-weight: 700; letter-spacing: -0.5px; line-height: 1.3;\">{ORG_NAME}</h1>\n              <p style=\"color: #ffffff; margin: 0; font-size: 14px; font-weight: 500; opacity: 0.95;\">{ORG_TAGLINE}</p>\n            </td>\n          </tr>\n"
    )
}

fn footer_link(href: &str, label: &str) -> String {
    format!(
        "                  <td style=\"padding: 0 8px;\">\n                    <a href=\"{href}\" style=\"color: #F97316; text-decoration: none; font-size: 14px;\">{label}</a>\n                  </td>\n"
    )
}

fn footer(audience: TemplateAudience, year: i32) -> String {
    let (links, reason) = match audience {
        TemplateAudience::Members => (
            [
                footer_link(SITE_URL, "Website"),
                footer_link(&format!("{SITE_URL}/portal"), "Member Portal"),
                footer_link(&format!("{SITE_URL}/contact?category=general"), "Contact Us"),
            ]
            .concat(),
            format!("You are receiving this email because you are a member of the {ORG_NAME}."),
        ),
        TemplateAudience::External => (
            [
                footer_link(SITE_URL, "Website"),
                footer_link(&format!("{SITE_URL}/contact"), "Contact Us"),
            ]
            .concat(),
            "You are receiving this email because you submitted a request through the CBOA website."
                .to_string(),
        ),
    };

    let mut out = String::new();
    out.push_str("          <tr>\n            <td style=\"background-color: #1F2937; color: #D1D5DB; padding: 30px 20px; text-align: center; font-size: 14px; line-height: 1.7; border-top: 3px solid #F97316;\">\n");
    out.push_str(&format!(
        "              <p style=\"margin: 0 0 10px 0; font-weight: 600; color: #ffffff;\">{ORG_NAME}</p>\n              <p style=\"margin: 0 0 15px 0;\">{ORG_LOCATION}</p>\n"
    ));
    out.push_str("              <table role=\"presentation\" cellspacing=\"0\" cellpadding=\"0\" border=\"0\" style=\"margin: 20px auto;\">\n                <tr>\n");
    out.push_str(&links);
    out.push_str("                </tr>\n              </table>\n");
    out.push_str(&format!(
        "              <p style=\"margin: 20px 0 10px 0; font-size: 13px; color: #9ca3af;\">{reason}</p>\n"
    ));
    out.push_str(&format!(
        "              <p style=\"margin: 0; font-size: 13px; color: #9ca3af;\">&copy; {year} {ORG_NAME}. All rights reserved.</p>\n"
    ));
    out.push_str("            </td>\n          </tr>\n");
    out
}

/// Minimal escaping for text placed in `<title>` and the preview div.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const HEAD_STYLE: &str = r#"  <!--[if mso]>
  <style type="text/css">
    body, table, td { font-family: Arial, Helvetica, sans-serif !important; }
  </style>
  <![endif]-->
  <style>
    :root {
      color-scheme: light;
      supported-color-schemes: light;
    }
    [data-ogsc] body,
    [data-ogsb] body {
      background-color: __OUTER_BG__ !important;
    }
    [data-ogsc] .email-content,
    [data-ogsb] .email-content {
      background-color: #ffffff !important;
      color: #333333 !important;
    }
    body {
      margin: 0;
      padding: 0;
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
      background-color: __OUTER_BG__;
      -webkit-text-size-adjust: 100%;
      -ms-text-size-adjust: 100%;
    }
    h1 { color: #003DA5; font-size: 24px; margin-top: 0; margin-bottom: 16px; font-weight: 700; line-height: 1.3; }
    h2 { color: #003DA5; font-size: 20px; margin-top: 24px; margin-bottom: 12px; font-weight: 600; border-bottom: 2px solid #F97316; padding-bottom: 8px; }
    h3 { color: #1f2937; font-size: 18px; margin-top: 20px; margin-bottom: 10px; font-weight: 600; }
    p { margin: 0 0 16px 0; font-size: 16px; line-height: 1.6; }
    ul, ol { margin: 0 0 16px 0; padding-left: 20px; }
    li { margin-bottom: 8px; font-size: 16px; line-height: 1.5; }
    a { color: #F97316; text-decoration: underline; }
    strong { color: #003DA5; font-weight: 600; }
    table { width: 100%; border-collapse: collapse; }
    th { background-color: #003DA5; color: #ffffff; padding: 12px; text-align: left; font-weight: 600; font-size: 14px; }
    td { padding: 10px 12px; border: 1px solid #E5E7EB; font-size: 14px; }
    blockquote { border-left: 4px solid #F97316; background-color: #FFF7ED; padding: 12px 16px; margin: 16px 0; font-style: italic; }
    .button {
      display: inline-block;
      padding: 14px 28px;
      min-height: 44px;
      background-color: #F97316;
      color: #ffffff !important;
      text-decoration: none;
      border-radius: 8px;
      font-weight: 600;
      font-size: 16px;
      margin: 16px 0;
      text-align: center;
    }
    @media only screen and (max-width: 480px) {
      h1 { font-size: 22px !important; }
      h2 { font-size: 18px !important; }
      .button { display: block !important; width: 100% !important; padding: 16px 20px !important; box-sizing: border-box !important; }
    }
  </style>
"#;
