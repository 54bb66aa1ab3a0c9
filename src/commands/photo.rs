use colored::Colorize;

use crate::food::analysis::{CapturedPhoto, PhotoSession};
use crate::food::display::photo_report;

pub async fn handle_command(session: &mut PhotoSession, args: &str) -> Result<(), String> {
    match args {
        "" => match session.result() {
            Some(result) => println!("{}", photo_report(result)),
            None => println!("Please specify a photo to analyze: photo <path>"),
        },
        "clear" => {
            session.clear();
            println!("Photo cleared.");
        }
        path => {
            let photo = CapturedPhoto::from_path(path)
                .await
                .map_err(|e| format!("Could not load photo: {}", e))?;
            println!("🔍 Analyzing {} ({})...", path, photo.media_type);
            session.capture(photo);

            let result = session
                .submit()
                .await
                .map_err(|e| format!("❌ {}", e))?;
            println!("{}", photo_report(result).truecolor(255, 236, 179));
        }
    }
    Ok(())
}
