//! Running a [`ClipPlan`] through ffmpeg.

use crate::Tools;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use reel_plan::{AudioSelection, ClipPlan};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::instrument;

/// ffmpeg arguments that cut `plan` into `output`.
///
/// Video is stream-copied; audio is re-encoded with the plan's encoding so
/// the clip is friendly to editors. The seek happens before `-i`, which is
/// fast and, with stream copy, snaps to the nearest preceding keyframe.
pub fn transcode_args(plan: &ClipPlan, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-ss"].map(OsString::from).into();
    args.push(plan.start().to_string().into());
    args.push("-i".into());
    args.push(plan.source_path().into());
    args.push("-t".into());
    args.push(plan.duration().to_string().into());
    args.extend(["-map", "0:v:0"].map(OsString::from));
    match plan.audio() {
        AudioSelection::All => args.extend(["-map", "0:a?"].map(OsString::from)),
        AudioSelection::Stream(index) => {
            args.push("-map".into());
            args.push(format!("0:a:{index}?").into());
        },
        AudioSelection::Silent => args.push("-an".into()),
    }
    args.extend(["-c:v", "copy"].map(OsString::from));
    if plan.audio() != AudioSelection::Silent {
        let encoding = plan.encoding();
        if plan.downmix_to_stereo() {
            args.push("-ac".into());
            args.push(encoding.stereo_channels.to_string().into());
        }
        args.push("-c:a".into());
        args.push(encoding.codec.as_str().into());
        args.push("-ar".into());
        args.push(encoding.sample_rate.to_string().into());
    }
    args.push(output.into());
    args
}

impl Tools {
    /// Cut the clip described by `plan`, returning where it was written.
    ///
    /// ffmpeg writes to a temporary file next to the final output, which is
    /// only renamed into place once ffmpeg succeeds. On failure the temporary
    /// file is removed and the final path is left untouched.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::TranscodeFailed`] with ffmpeg's diagnostics if it exits
    /// unsuccessfully, or [`ErrorKind::Io`] if the output can't be prepared or
    /// moved into place.
    #[instrument(skip_all, fields(source = %plan.source_path().display(), output = %plan.output_path().display()))]
    pub fn transcode(&self, plan: &ClipPlan) -> Result<PathBuf> {
        let output = plan.output_path();
        let directory = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(directory).or_raise(|| ErrorKind::Io)?;
        let suffix = output.extension().map(|ext| format!(".{}", ext.to_string_lossy())).unwrap_or_default();
        let staged = tempfile::Builder::new()
            .prefix(".reel-")
            .suffix(&suffix)
            .tempfile_in(directory)
            .or_raise(|| ErrorKind::Io)?;

        let args = transcode_args(plan, staged.path());
        tracing::info!(start = %plan.start(), duration = %plan.duration(), "Running ffmpeg");
        tracing::debug!(command = ?args, "ffmpeg arguments");
        let result = Command::new(self.ffmpeg())
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .or_raise(|| ErrorKind::Io)?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            exn::bail!(ErrorKind::TranscodeFailed { code: result.status.code(), stderr });
        }

        staged.persist(output).or_raise(|| ErrorKind::Io)?;
        tracing::info!("Clip written");
        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_plan::{AudioDecision, AudioEncoding, ClipPlanner, SelectionReason, Timestamp};
    use rstest::rstest;

    fn plan(selection: AudioSelection, downmix_to_stereo: bool) -> ClipPlan {
        let decision = AudioDecision { selection, downmix_to_stereo, reason: SelectionReason::ExactLanguage };
        ClipPlanner::new("/clips", AudioEncoding::default())
            .plan("/movies/Heat.1995.mkv", Timestamp::from_secs(5025), Timestamp::from_secs(30), &decision)
            .unwrap()
    }

    fn args(plan: &ClipPlan) -> Vec<String> {
        transcode_args(plan, Path::new("/clips/.reel-tmp.mp4"))
            .into_iter()
            .map(|arg| arg.into_string().unwrap())
            .collect()
    }

    #[test]
    fn single_stream_with_downmix() {
        assert_eq!(
            args(&plan(AudioSelection::Stream(1), true)).join(" "),
            "-hide_banner -loglevel error -y -ss 01:23:45 -i /movies/Heat.1995.mkv -t 00:00:30 \
             -map 0:v:0 -map 0:a:1? -c:v copy -ac 2 -c:a pcm_s16le -ar 48000 /clips/.reel-tmp.mp4"
        );
    }

    #[rstest]
    #[case::one_stream_downmixed(AudioSelection::Stream(1), true, Some("0:a:1?"), true)]
    #[case::one_stream_as_is(AudioSelection::Stream(0), false, Some("0:a:0?"), false)]
    #[case::all_streams(AudioSelection::All, false, Some("0:a?"), false)]
    #[case::all_streams_downmixed(AudioSelection::All, true, Some("0:a?"), true)]
    #[case::silent(AudioSelection::Silent, false, None, false)]
    #[case::silent_ignores_downmix(AudioSelection::Silent, true, None, false)]
    fn maps_selected_audio(
        #[case] selection: AudioSelection,
        #[case] downmix: bool,
        #[case] audio_map: Option<&str>,
        #[case] stereo: bool,
    ) {
        let args = args(&plan(selection, downmix));
        let maps: Vec<&str> = args.windows(2).filter(|pair| pair[0] == "-map").map(|pair| pair[1].as_str()).collect();
        let expected: Vec<&str> = std::iter::once("0:v:0").chain(audio_map).collect();
        assert_eq!(maps, expected);
        assert_eq!(args.windows(2).any(|pair| pair == ["-ac", "2"]), stereo);
        assert_eq!(args.contains(&"-an".to_string()), audio_map.is_none());
        assert_eq!(args.windows(2).any(|pair| pair == ["-c:a", "pcm_s16le"]), audio_map.is_some());
        assert_eq!(args.last().map(String::as_str), Some("/clips/.reel-tmp.mp4"));
    }

    #[test]
    fn failed_run_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let decision = AudioDecision {
            selection: AudioSelection::Silent,
            downmix_to_stereo: false,
            reason: SelectionReason::NoStreams,
        };
        let plan = ClipPlanner::new(dir.path().join("clips"), AudioEncoding::default())
            .plan("/movies/Heat.mkv", Timestamp::ZERO, Timestamp::from_secs(5), &decision)
            .unwrap();
        // `false` accepts any arguments and exits non-zero.
        let Ok(false_bin) = which::which("false") else { return };
        let err = Tools::new(false_bin, None).transcode(&plan).unwrap_err();
        assert!(matches!(&*err, ErrorKind::TranscodeFailed { code: Some(1), .. }));
        assert!(!plan.output_path().exists());
        assert_eq!(fs::read_dir(dir.path().join("clips")).unwrap().count(), 0);
    }
}
