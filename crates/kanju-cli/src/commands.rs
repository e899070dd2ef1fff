//! Command handlers. User-facing text goes to `out`; diagnostics go through
//! `tracing`.

use std::io::{self, BufRead, Write};

use chrono::Utc;
use kanju_core::error::KanjuError;
use kanju_core::format::relative_time;
use kanju_parse::link::{self, LinkError};
use kanju_parse::VideoMeta;

use crate::app::Kanju;
use crate::cli::{Command, LineArgs};

const MSG_EMPTY_URL: &str = "请输入视频地址";
const MSG_INVALID_URL: &str = "请输入有效的视频地址";
const MSG_SUPPORTED: &str = "若当前线路无法播放，请尝试切换其他线路";
const MSG_UNSUPPORTED: &str = "当前线路若无法播放，请尝试切换其他线路";
const MSG_OPEN_FAILED: &str = "解析失败，请尝试切换其他线路";
const MSG_NO_HISTORY: &str = "暂无观看历史";
const MSG_NOTE_UPDATED: &str = "备注已更新";
const MSG_CONFIRM_CLEAR: &str = "确定要清空所有观看历史吗？[y/N] ";
const MSG_CLEARED: &str = "历史记录已清空";

/// How a command ended, mapped to the process exit code by `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Done,
    Rejected,
}

pub fn run(
    app: &mut Kanju,
    command: Command,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<Status, KanjuError> {
    match command {
        Command::Play { url, line } => play(app, &url, &line, out),
        Command::Replay { index, line } => match app.history.get(index) {
            Some(record) => play(app, &record.url, &line, out),
            None => {
                writeln!(out, "没有第 {index} 条历史记录")?;
                Ok(Status::Rejected)
            }
        },
        Command::Info { url } => {
            print_meta(&kanju_parse::extract(url.trim()), out)?;
            Ok(Status::Done)
        }
        Command::History { json } => history(app, json, out),
        Command::Note { index, text } => {
            if app.history.set_note(index, &text) {
                writeln!(out, "{MSG_NOTE_UPDATED}")?;
            }
            Ok(Status::Done)
        }
        Command::Clear { yes } => clear(app, yes, out, input),
        Command::Lines => lines(app, out),
    }
}

fn play(
    app: &mut Kanju,
    raw: &str,
    line: &LineArgs,
    out: &mut impl Write,
) -> Result<Status, KanjuError> {
    let video_url = raw.trim();
    match link::validate(video_url) {
        Ok(_) => {}
        Err(LinkError::Empty) => {
            writeln!(out, "{MSG_EMPTY_URL}")?;
            return Ok(Status::Rejected);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected video URL");
            writeln!(out, "{MSG_INVALID_URL}")?;
            return Ok(Status::Rejected);
        }
    }

    let template = match &line.api {
        Some(api) => api.clone(),
        None => app.config.resolve_line(line.line.as_deref())?.template.clone(),
    };

    match app.platforms.match_url(video_url) {
        Some(name) => {
            tracing::debug!(platform = name, "Known platform");
            writeln!(out, "{MSG_SUPPORTED}")?;
        }
        None => writeln!(out, "{MSG_UNSUPPORTED}")?,
    }

    let meta = kanju_parse::extract(video_url);
    app.history.upsert(video_url, &meta);
    print_meta(&meta, out)?;

    let player = link::player_url(&template, video_url);
    writeln!(out, "{player}")?;

    if line.open || app.config.general.open_in_browser {
        if let Err(e) = open::that(&player) {
            tracing::warn!("Failed to open player page: {e}");
            writeln!(out, "{MSG_OPEN_FAILED}")?;
            return Ok(Status::Rejected);
        }
    }
    Ok(Status::Done)
}

fn print_meta(meta: &VideoMeta, out: &mut impl Write) -> io::Result<()> {
    if meta.has_episode() {
        writeln!(out, "{}  {}", meta.title, meta.episode)
    } else {
        writeln!(out, "{}", meta.title)
    }
}

fn history(app: &Kanju, json: bool, out: &mut impl Write) -> Result<Status, KanjuError> {
    if json {
        writeln!(out, "{}", app.history.export_json())?;
        return Ok(Status::Done);
    }

    let records = app.history.list();
    if records.is_empty() {
        writeln!(out, "{MSG_NO_HISTORY}")?;
        return Ok(Status::Done);
    }

    let now = Utc::now();
    for (i, record) in records.iter().enumerate() {
        let mut line = format!("{i:>2}. {}", record.title);
        if !record.episode.is_empty() {
            line.push_str("  ");
            line.push_str(&record.episode);
        }
        writeln!(out, "{line}  ({})", relative_time(&record.last_watch, &now))?;
        writeln!(out, "    {}", record.url)?;
        if !record.note.is_empty() {
            writeln!(out, "    备注: {}", record.note)?;
        }
    }
    Ok(Status::Done)
}

fn clear(
    app: &mut Kanju,
    yes: bool,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<Status, KanjuError> {
    if !yes {
        write!(out, "{MSG_CONFIRM_CLEAR}")?;
        out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            return Ok(Status::Done);
        }
    }
    app.history.clear();
    writeln!(out, "{MSG_CLEARED}")?;
    Ok(Status::Done)
}

fn lines(app: &Kanju, out: &mut impl Write) -> Result<Status, KanjuError> {
    if app.config.lines.is_empty() {
        writeln!(out, "未配置解析线路")?;
        return Ok(Status::Done);
    }
    let default = app.config.resolve_line(None).ok().map(|l| l.name.as_str());
    for line in &app.config.lines {
        let marker = if Some(line.name.as_str()) == default { "*" } else { " " };
        writeln!(out, "{marker} {}  {}", line.name, line.template)?;
    }
    Ok(Status::Done)
}
