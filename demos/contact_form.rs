//! Walks the contact form through a failed and a successful submission.
//!
//! Run with `RUST_LOG=inquest=debug` to see validation and state transitions.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use inquest::schema::contact::{contact_form_schema, fields, skill_options};
use inquest::{
    read_with_progress, FieldValue, FileDropState, FileRef, FormConfig, FormController, FormState,
    SelectState, SimulatedSubmitHandler, SubmitRejected,
};
use parking_lot::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inquest=info,contact_form=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = FormConfig::from_json_str(r#"{ "submit_timeout_ms": 10000 }"#)?;
    let state = FormState::new(Arc::new(contact_form_schema())).with_config(config.clone());
    let handler = SimulatedSubmitHandler::new().with_delay(Duration::from_millis(300));
    let controller = FormController::new(state, handler);

    controller.set_value(fields::NAME, FieldValue::from("A"));
    controller.set_value(fields::PHONE, FieldValue::from("123"));

    if let Err(SubmitRejected::Invalid(report)) = controller.submit().await {
        println!("first attempt rejected:");
        for (field, message) in report.iter() {
            println!("  {:<8} {}", field, message);
        }
    }

    // Fix the form field by field.
    controller.set_value(fields::NAME, FieldValue::from("Ada Lovelace"));
    controller.set_value(fields::PHONE, FieldValue::from("+1-212-456-7890"));
    controller.set_value(fields::EMAIL, FieldValue::from("ada@example.com"));

    let options = skill_options();
    let mut skills = SelectState::multiple().configured(&config);
    let now = Instant::now();
    skills.toggle_open();
    let wanted = ["React", "NodeJS", "Python"];
    for option in options.iter().filter(|o| wanted.contains(&o.label.as_str())) {
        skills.press_option(now);
        skills.blur(now);
        skills.click_option(option);
    }
    controller.set_value(fields::SKILLS, skills.to_field_value());

    let upload = Mutex::new(FileDropState::new());
    let contents = vec![b'%'; 300_000];
    let file = FileRef::new("curriculum-vitae.pdf", "application/pdf", contents.len() as u64);
    let picked = {
        let mut upload = upload.lock();
        upload.drag_enter();
        upload.drop_files([file.clone()])
    };
    if let Some((event, ticket)) = picked {
        read_with_progress(&upload, ticket, contents.as_slice(), file.size).await?;
        println!("read {} ({}%)", file.short_name(), upload.lock().progress());
        controller.apply_upload_event(fields::FILE, event);
    }

    controller.set_value(fields::CONSENT, FieldValue::from(true));

    match controller.submit().await {
        Ok(status) => println!("second attempt: {:?}", status),
        Err(rejected) => println!("second attempt rejected: {}", rejected),
    }
    Ok(())
}
