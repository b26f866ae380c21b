use log::warn;

/// Switches between the two shapes of a match: the timed one that ends in a
/// clear screen with music, and the endless silent one that runs on into the
/// late phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    pub game_clear: bool,
    pub soundtrack: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig { game_clear: true, soundtrack: true }
    }
}

impl MatchConfig {
    pub fn endless() -> Self {
        MatchConfig { game_clear: false, soundtrack: false }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchOptions {
    pub debug: bool,
    pub debug_width: u16,
    pub debug_height: u16,
    pub max_frames: Option<u64>,
    pub seed: Option<u64>,
    pub config: MatchConfig,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        LaunchOptions {
            debug: false,
            debug_width: 80,
            debug_height: 24,
            max_frames: None,
            seed: None,
            config: MatchConfig::default(),
        }
    }
}

impl LaunchOptions {
    /// Parses `args` without the program name:
    /// `[--debug [WIDTH HEIGHT [MAX_FRAMES]]] [--endless] [--mute] [--seed N]`.
    /// Without `--debug` a bare number is taken as the frame limit.
    pub fn parse(args: &[String]) -> Self {
        let mut options = LaunchOptions::default();
        let mut positional: Vec<u64> = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--debug" => options.debug = true,
                "--endless" => options.config = MatchConfig::endless(),
                "--mute" => options.config.soundtrack = false,
                "--seed" => match iter.next().map(|s| s.parse::<u64>()) {
                    Some(Ok(seed)) => options.seed = Some(seed),
                    _ => warn!("--seed expects a number; ignoring."),
                },
                other => match other.parse::<u64>() {
                    Ok(num) => positional.push(num),
                    Err(_) => warn!("Ignoring unknown argument '{}'.", other),
                },
            }
        }

        if options.debug {
            if positional.len() >= 2 {
                options.debug_width = u16::try_from(positional[0]).unwrap_or(80);
                options.debug_height = u16::try_from(positional[1]).unwrap_or(24);
            }
            options.max_frames = positional.get(2).copied();
        } else {
            options.max_frames = positional.first().copied();
        }
        options
    }
}
