//! HTML bodies for outgoing mail.

use crate::rsvp::Rsvp;

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const BODY_STYLE: &str = "font-family: system-ui, -apple-system, sans-serif; line-height: 1.6; color: #121212; max-width: 600px; margin: 0 auto; padding: 20px;";
const PANEL_STYLE: &str = "background: #F9F4EC; padding: 30px; border-radius: 8px;";
const BUTTON_STYLE: &str = "display: inline-block; background: #1D3B2A; color: #F9F4EC; padding: 12px 24px; text-decoration: none; border-radius: 4px;";

fn page(title: &str, couple: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
  </head>
  <body style="{BODY_STYLE}">
    <div style="text-align: center; margin-bottom: 30px;">
      <h1 style="font-family: 'Playfair Display', serif; color: #1D3B2A; font-size: 32px; margin: 0;">{couple}</h1>
    </div>
    <div style="{PANEL_STYLE}">
{content}
    </div>
  </body>
</html>
"#,
        couple = escape_html(couple),
    )
}

fn answer_line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "        <p><strong>{label}:</strong> {}</p>\n",
        escape_html(value)
    ));
}

pub(crate) fn rsvp_confirmation_html(
    rsvp: &Rsvp,
    couple: &str,
    update_link: &str,
    has_invite: bool,
) -> String {
    let mut answers = String::new();
    answer_line(
        &mut answers,
        "Status",
        if rsvp.attending { "Attending" } else { "Not Attending" },
    );
    if rsvp.attending {
        answer_line(&mut answers, "Party Size", &rsvp.party_size.to_string());
    }
    if let Some(meal) = rsvp.meal_preference {
        answer_line(&mut answers, "Meal Preference", meal.as_str());
    }
    if let Some(ref allergies) = rsvp.allergies {
        answer_line(&mut answers, "Dietary Restrictions", allergies);
    }
    if let Some(ref song) = rsvp.song_request {
        answer_line(&mut answers, "Song Request", song);
    }
    if let Some(ref notes) = rsvp.notes {
        answer_line(&mut answers, "Notes", notes);
    }

    let invite = if has_invite {
        "      <p>We've attached a calendar file for the ceremony.</p>\n"
    } else {
        ""
    };

    let content = format!(
        r#"      <h2 style="color: #1D3B2A; margin-top: 0;">RSVP Confirmation</h2>
      <p>Dear {name},</p>
      <p>Thank you for your RSVP! We've received your response:</p>
      <div style="background: white; padding: 20px; border-radius: 4px; margin: 20px 0;">
{answers}      </div>
{invite}      <p>If you need to update your RSVP, you can do so using this link:</p>
      <p style="margin: 20px 0;"><a href="{link}" style="{BUTTON_STYLE}">Update RSVP</a></p>
      <p style="margin-top: 30px; color: #666; font-size: 14px;">Confirmation Code: <code>{code}</code></p>
      <p style="text-align: center; color: #666; font-size: 14px;">We can't wait to celebrate with you!</p>"#,
        name = escape_html(&rsvp.name),
        link = escape_html(update_link),
        code = escape_html(&rsvp.confirmation_code),
    );

    page("RSVP Confirmation", couple, &content)
}

pub(crate) fn photo_approved_html(couple: &str, gallery_link: &str) -> String {
    let content = format!(
        r#"      <h2 style="color: #1D3B2A; margin-top: 0;">Photo Approved!</h2>
      <p>Thank you for sharing your photos with us!</p>
      <p>Your photo has been approved and is now visible in our gallery.</p>
      <p style="margin: 20px 0;"><a href="{link}" style="{BUTTON_STYLE}">View Gallery</a></p>"#,
        link = escape_html(gallery_link),
    );

    page("Photo Approved", couple, &content)
}
