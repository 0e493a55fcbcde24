//! Line commands read from stdin.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use aura_core::state::YtVideoInfo;
use aura_core::{AppEvent, EventHub, View};

/// One parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Forwarded to the core as-is.
    Event(AppEvent),
    /// A video was opened; the core records it, then sees it load.
    Video(YtVideoInfo),
    Help,
}

impl Input {
    /// Emit this command on `hub`. Returns `false` for commands the core
    /// never sees.
    pub fn emit(self, hub: &EventHub) -> bool {
        match self {
            Input::Event(event) => hub.emit(event),
            Input::Video(info) => {
                hub.emit(AppEvent::YtVideoSelected(info));
                hub.emit(AppEvent::YtVideoLoaded);
            }
            Input::Help => return false,
        }
        true
    }
}

pub const HELP: &str = "\
views:     home | player | playlist | youtube | settings | equalizer | themes
library:   add <file>... | play <n> | now
playback:  toggle | shuffle | repeat | like | vol <0-1>
media:     seek <secs> | tick <secs>
youtube:   yt <id> [title] | audio
other:     ai | clock | status | help | quit";

pub fn parse_line(line: &str) -> anyhow::Result<Option<Input>> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(None);
    };

    if let Some(view) = View::from_name(cmd) {
        return Ok(Some(Input::Event(AppEvent::Navigate(view))));
    }

    let input = match cmd {
        "add" => {
            let paths: Vec<PathBuf> = words.map(PathBuf::from).collect();
            if paths.is_empty() {
                bail!("add: expected at least one path");
            }
            Input::Event(AppEvent::FilesDropped(paths))
        }
        "play" => {
            let n: usize = number(words.next(), "play")?;
            let index = n.checked_sub(1).ok_or_else(|| anyhow!("play: tracks start at 1"))?;
            Input::Event(AppEvent::PlayFromLibrary(index))
        }
        "now" => Input::Event(AppEvent::NowPlayingClicked),
        "toggle" | "pause" => Input::Event(AppEvent::PlayPauseClicked),
        "shuffle" => Input::Event(AppEvent::ToggleShuffle),
        "repeat" => Input::Event(AppEvent::CycleRepeat),
        "like" => Input::Event(AppEvent::ToggleLikeCurrent),
        "vol" => Input::Event(AppEvent::SetVolume(number(words.next(), "vol")?)),
        "ai" => Input::Event(AppEvent::ToggleAiFeatures),
        "clock" => Input::Event(AppEvent::ToggleClock),
        "audio" => Input::Event(AppEvent::YtToggleClicked),
        "quit" | "exit" => Input::Event(AppEvent::Shutdown),
        "seek" => Input::Event(AppEvent::Seek(number(words.next(), "seek")?)),
        "tick" => Input::Event(AppEvent::Tick(number(words.next(), "tick")?)),
        "yt" => {
            let id = words
                .next()
                .ok_or_else(|| anyhow!("yt: expected a video id"))?
                .to_string();
            let title = words.collect::<Vec<_>>().join(" ");
            Input::Video(YtVideoInfo {
                id: Some(id),
                title: (!title.is_empty()).then_some(title),
                author: None,
            })
        }
        "status" => Input::Event(AppEvent::Refresh),
        "help" | "?" => Input::Help,
        other => bail!("unknown command {:?} (try `help`)", other),
    };
    Ok(Some(input))
}

fn number<T: std::str::FromStr>(word: Option<&str>, cmd: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let word = word.ok_or_else(|| anyhow!("{cmd}: expected a number"))?;
    word.parse()
        .with_context(|| format!("{cmd}: {word:?} is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_views_and_events() {
        assert_eq!(
            parse_line("youtube").unwrap(),
            Some(Input::Event(AppEvent::Navigate(View::Youtube)))
        );
        assert_eq!(
            parse_line("  play 2 ").unwrap(),
            Some(Input::Event(AppEvent::PlayFromLibrary(1)))
        );
        assert_eq!(
            parse_line("vol 0.5").unwrap(),
            Some(Input::Event(AppEvent::SetVolume(0.5)))
        );
        assert_eq!(parse_line("").unwrap(), None);
    }

    #[test]
    fn test_parse_youtube_video() {
        assert_eq!(
            parse_line("yt dQw4w9WgXcQ Never Gonna").unwrap(),
            Some(Input::Video(YtVideoInfo {
                id: Some("dQw4w9WgXcQ".into()),
                title: Some("Never Gonna".into()),
                author: None,
            }))
        );
        assert_eq!(
            parse_line("yt abcdef").unwrap(),
            Some(Input::Video(YtVideoInfo {
                id: Some("abcdef".into()),
                title: None,
                author: None,
            }))
        );
    }

    #[test]
    fn test_commands_reach_the_core_queue() {
        let (hub, mut queue) = EventHub::channel();
        for line in ["seek 12", "tick 1.5", "status", "yt abc Title", "help"] {
            parse_line(line).unwrap().unwrap().emit(&hub);
        }
        let seen: Vec<AppEvent> = std::iter::from_fn(|| queue.try_recv()).collect();
        assert_eq!(
            seen,
            vec![
                AppEvent::Seek(12.0),
                AppEvent::Tick(1.5),
                AppEvent::Refresh,
                AppEvent::YtVideoSelected(YtVideoInfo {
                    id: Some("abc".into()),
                    title: Some("Title".into()),
                    author: None,
                }),
                AppEvent::YtVideoLoaded,
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("play 0").is_err());
        assert!(parse_line("play x").is_err());
        assert!(parse_line("add").is_err());
        assert!(parse_line("dance").is_err());
    }
}
