use clap::Args;
use std::path::PathBuf;
use std::str::FromStr;
use storyreel_core::{CarouselScreen, Config, ItemId};

use super::{load_items, print_event};
use crate::surfaces::{ConsoleIndicator, ConsolePaging};

#[derive(Args)]
pub struct ReplayArgs {
    /// Deck file (TOML, or JSON with a .json extension)
    pub deck: PathBuf,
    /// Script file, one step per line
    pub script: PathBuf,
    /// Override the configured segment duration (ms)
    #[arg(long)]
    pub segment_ms: Option<u64>,
}

/// One scripted user or clock action.
///
/// ```text
/// tick 1500        # advance the virtual clock and tick
/// swipe b          # swipe settled on item "b" (or an index)
/// indicator 0      # tap page 0 on the indicator
/// tap 380 400      # tap at x=380 on a 400-wide screen
/// rewind | skip | pause | resume | dismiss
/// ```
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Tick(u64),
    Swipe(String),
    Indicator(usize),
    Tap { x: f64, width: f64 },
    Rewind,
    Skip,
    Pause,
    Resume,
    Dismiss,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or("empty step")?;
        let mut arg = |name: &str| {
            parts
                .next()
                .map(str::to_string)
                .ok_or_else(|| format!("'{verb}' needs {name}"))
        };
        let number = |value: String| {
            value
                .parse::<f64>()
                .map_err(|e| format!("'{verb}': bad number '{value}': {e}"))
        };

        let step = match verb {
            "tick" => Step::Tick(
                arg("a duration in ms")?
                    .parse()
                    .map_err(|e| format!("'tick': {e}"))?,
            ),
            "swipe" => Step::Swipe(arg("an item id or index")?),
            "indicator" => Step::Indicator(
                arg("a page index")?
                    .parse()
                    .map_err(|e| format!("'indicator': {e}"))?,
            ),
            "tap" => {
                let x = number(arg("x")?)?;
                let width = number(arg("width")?)?;
                Step::Tap { x, width }
            }
            "rewind" => Step::Rewind,
            "skip" => Step::Skip,
            "pause" => Step::Pause,
            "resume" => Step::Resume,
            "dismiss" => Step::Dismiss,
            other => return Err(format!("unknown step '{other}'")),
        };
        Ok(step)
    }
}

fn parse_script(content: &str) -> Result<Vec<Step>, String> {
    content
        .lines()
        .enumerate()
        .filter_map(|(n, line)| {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                None
            } else {
                Some(line.parse().map_err(|e| format!("line {}: {e}", n + 1)))
            }
        })
        .collect()
}

pub fn run(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(ms) = args.segment_ms {
        config.timer.segment_duration_ms = ms;
    }
    config.validate()?;

    let items = load_items(&args.deck)?;
    let steps = parse_script(&std::fs::read_to_string(&args.script)?)?;

    let mut screen = CarouselScreen::new(
        items,
        &config,
        ConsolePaging,
        ConsoleIndicator::default(),
    )?;

    let mut now: u64 = 0;
    let emit = |events: Vec<storyreel_core::Event>| events.iter().for_each(print_event);
    emit(screen.appear_at(now)?);

    for step in steps {
        let events = match step {
            Step::Tick(ms) => {
                now = now.saturating_add(ms);
                screen.tick_at(now)?
            }
            Step::Swipe(target) => {
                let id = resolve_swipe_target(&screen, &target);
                screen.swipe_completed_at(&id, now)?
            }
            Step::Indicator(index) => screen.indicator_tapped_at(index, now)?,
            Step::Tap { x, width } => screen.tap_at(x, width, now)?,
            Step::Rewind => screen.rewind_at(now)?,
            Step::Skip => screen.skip_at(now)?,
            Step::Pause => screen.pause_at(now)?,
            Step::Resume => screen.resume_at(now)?,
            Step::Dismiss => screen.dismiss(),
        };
        emit(events);
    }

    print_event(&screen.timer().snapshot());
    Ok(())
}

/// Item ids win; otherwise a number is taken as an index.
fn resolve_swipe_target(
    screen: &CarouselScreen<ConsolePaging, ConsoleIndicator>,
    target: &str,
) -> ItemId {
    let state = screen.controller().state();
    let id = ItemId::new(target);
    if state.index_of(&id).is_some() {
        return id;
    }
    target
        .parse::<usize>()
        .ok()
        .and_then(|index| state.item(index))
        .map(|item| item.id.clone())
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step() {
        let steps = parse_script(
            "tick 1500\nswipe b\n# comment\n\nindicator 0\ntap 380 400 # skip zone\nrewind\nskip\npause\nresume\ndismiss\n",
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Tick(1500),
                Step::Swipe("b".into()),
                Step::Indicator(0),
                Step::Tap {
                    x: 380.0,
                    width: 400.0
                },
                Step::Rewind,
                Step::Skip,
                Step::Pause,
                Step::Resume,
                Step::Dismiss,
            ]
        );
    }

    #[test]
    fn reports_line_numbers() {
        let err = parse_script("tick 10\njump 3\n").unwrap_err();
        assert!(err.starts_with("line 2"), "{err}");
        assert!(parse_script("tick").is_err());
        assert!(parse_script("indicator x").is_err());
    }
}
