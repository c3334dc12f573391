use anyhow::Context as _;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::AuthConfig;
use crate::domain::repository::Mailer;
use crate::domain::types::{EmailTemplate, Mail, TOKEN_TTL_MINUTES};
use crate::error::AuthServiceError;

/// Mailer selected at startup: real SMTP when `SMTP_HOST` is set, log-only otherwise.
#[derive(Clone)]
pub enum AppMailer {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl AppMailer {
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        let Some(host) = config.smtp_host.as_deref() else {
            return Ok(Self::Log(LogMailer));
        };
        let from: Mailbox = config.mail_from.parse().context("invalid MAIL_FROM")?;

        let builder = if config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .context("invalid SMTP_HOST")?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };
        let mut builder = builder.port(config.smtp_port);
        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self::Smtp(SmtpMailer {
            transport: builder.build(),
            from,
        }))
    }
}

impl Mailer for AppMailer {
    async fn send(&self, mail: &Mail) -> Result<(), AuthServiceError> {
        match self {
            Self::Smtp(m) => m.send(mail).await,
            Self::Log(m) => m.send(mail).await,
        }
    }
}

// ── SMTP ──────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer for SmtpMailer {
    async fn send(&self, mail: &Mail) -> Result<(), AuthServiceError> {
        let message = build_message(&self.from, mail).map_err(AuthServiceError::DeliveryFailure)?;
        self.transport
            .send(message)
            .await
            .context("smtp send")
            .map_err(AuthServiceError::DeliveryFailure)?;
        info!(to = %mail.to, template = mail.template.name(), "email sent");
        Ok(())
    }
}

fn build_message(from: &Mailbox, mail: &Mail) -> anyhow::Result<Message> {
    let address: Address = mail.to.parse().context("invalid recipient address")?;
    let to = Mailbox::new(Some(mail.display_name.clone()), address);
    let (text, html) = render(mail);
    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(mail.subject.clone())
        .multipart(MultiPart::alternative_plain_html(text, html))
        .context("build email")
}

// ── Log only ──────────────────────────────────────────────────────────────────

/// Writes the email to the log instead of delivering it. Local development only.
#[derive(Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, mail: &Mail) -> Result<(), AuthServiceError> {
        info!(
            to = %mail.to,
            template = mail.template.name(),
            subject = %mail.subject,
            action_url = %mail.action_url,
            code = %mail.code,
            "email not delivered (no SMTP_HOST configured)"
        );
        Ok(())
    }
}

// ── Templates ─────────────────────────────────────────────────────────────────

fn intro(template: EmailTemplate) -> &'static str {
    match template {
        EmailTemplate::ActivateAccount => "Thanks for joining Booknet. Use this code to activate your account:",
        EmailTemplate::ForgotPassword => "We received a request to reset your password. Use this code to continue:",
    }
}

/// Render the plain-text and HTML bodies of a code email.
pub fn render(mail: &Mail) -> (String, String) {
    let text = format!(
        "Hello {name},\n\n{intro}\n\n    {code}\n\nEnter it at {url}\nThe code expires in {ttl} minutes.\n",
        name = mail.display_name,
        intro = intro(mail.template),
        code = mail.code,
        url = mail.action_url,
        ttl = TOKEN_TTL_MINUTES,
    );
    let html = format!(
        "<p>Hello {name},</p>\
         <p>{intro}</p>\
         <p style=\"font-size:24px;letter-spacing:4px\"><strong>{code}</strong></p>\
         <p><a href=\"{url}\">{url}</a></p>\
         <p>The code expires in {ttl} minutes.</p>",
        name = escape_html(&mail.display_name),
        intro = intro(mail.template),
        code = escape_html(&mail.code),
        url = escape_html(&mail.action_url),
        ttl = TOKEN_TTL_MINUTES,
    );
    (text, html)
}

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
