use std::env;
use std::io::{self, Write};
use crossterm::{
    cursor::{Hide, Show},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, size, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, warn};

use kokaton_survive::config::LaunchOptions;
use kokaton_survive::game::Game;
use kokaton_survive::rendering::{OutputTarget, ScreenBuffer};
use kokaton_survive::terminal_io::SimulatedInput;

fn main() -> io::Result<()> {
    if let Err(e) = simple_logging::log_to_file("kokaton-survive.log", log::LevelFilter::Info) {
        eprintln!("Could not open log file: {}", e);
    }
    info!("Starting kokaton-survive.");

    let args: Vec<String> = env::args().skip(1).collect();
    let options = LaunchOptions::parse(&args);

    if options.debug {
        info!(
            "Debug mode: {}x{}, frame limit {:?}.",
            options.debug_width, options.debug_height, options.max_frames
        );
        let target = OutputTarget::ScreenBuffer(ScreenBuffer::new(options.debug_width, options.debug_height));
        let mut game = Game::new(
            options.debug_width,
            options.debug_height,
            target,
            Some(SimulatedInput::demo_script()),
            &options,
        );
        let outcome = game.run()?;
        info!("Debug run finished: {:?}.", outcome);
        return Ok(());
    }

    enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
    let (terminal_width, terminal_height) = size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}", terminal_width, terminal_height);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide).map_err(|e| { error!("Failed to prepare screen: {}", e); e })?;
    // Release events and bare Shift presses need the kitty keyboard protocol.
    let keyboard_enhanced = execute!(
        stdout,
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
        )
    )
    .is_ok();
    if !keyboard_enhanced {
        warn!("Keyboard enhancement unavailable; falling back to key-repeat timing.");
    }

    let mut game = Game::new(terminal_width, terminal_height, OutputTarget::Stdout(io::stdout()), None, &options);
    let result = game.run();
    match &result {
        Ok(outcome) => info!("Match finished: {:?}.", outcome),
        Err(e) => error!("Match aborted: {}", e),
    }

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
    let _ = stdout.flush();
    let _ = disable_raw_mode();

    result.map(|_| ())
}
