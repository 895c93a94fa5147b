use crate::component::PhotoDateOrganizer;
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use rust_i18n::t;

pub fn run_photo_organizer(term: &Term, config: &mut Config) -> Result<()> {
    let mut organizer = PhotoDateOrganizer::new(config);

    if let Err(e) = organizer.run() {
        eprintln!("{} {e:#}", style(t!("main_menu.error_prefix")).red().bold());
    }

    pause(term)?;
    Ok(())
}
