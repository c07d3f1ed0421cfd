/*!
 * Frame writers: SubRip and WebVTT emitters.
 *
 * Both consume the frame sequence a reader produces and write UTF-8
 * directly to the sink. Sink I/O failures are hard failures of the whole
 * conversion; there is no partial-output recovery.
 */

use std::io::Write;

use super::Frame;
use crate::errors::ConversionError;
use crate::markup::{strip_style_markers, tag_box, tag_unbox};
use crate::time_codec::{format_srt_time, format_vtt_time};
use crate::xml_text::escape_xml_text;

const NEW_LINE: &str = "\r\n";

// xml 1.0 or xml 1.1 schema
const USE_XML10_ESCAPE: bool = true;

/// SubRip emitter: numbered cue blocks with comma-millisecond times.
pub struct SubRipWriter<W: Write> {
    sink: W,
    ignore_empty_frames: bool,
    frame_index: u32,
}

impl<W: Write> SubRipWriter<W> {
    pub fn new(sink: W, ignore_empty_frames: bool) -> Self {
        SubRipWriter {
            sink,
            ignore_empty_frames,
            frame_index: 1,
        }
    }

    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), ConversionError> {
        if self.ignore_empty_frames && frame.is_empty_text() {
            return Ok(());
        }

        write!(
            self.sink,
            "{}{nl}{} --> {}{nl}{}{nl}{nl}",
            self.frame_index,
            format_srt_time(frame.start),
            format_srt_time(frame.end),
            strip_style_markers(&frame.text),
            nl = NEW_LINE,
        )?;
        self.frame_index += 1;

        Ok(())
    }
}

/// WebVTT emitter: header plus cue blocks with dot-millisecond times.
///
/// Cue text passes through the XML escaper on the way out; the inline
/// `<b>`/`<i>`/`<u>` markers are boxed before and unboxed after so the
/// escaper can't mangle them.
pub struct WebVttWriter<W: Write> {
    sink: W,
    ignore_empty_frames: bool,
}

impl<W: Write> WebVttWriter<W> {
    /// Create the writer and emit the `WEBVTT` header.
    pub fn new(mut sink: W, ignore_empty_frames: bool) -> Result<Self, ConversionError> {
        sink.write_all(b"WEBVTT")?;
        sink.write_all(NEW_LINE.as_bytes())?;

        Ok(WebVttWriter {
            sink,
            ignore_empty_frames,
        })
    }

    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), ConversionError> {
        if self.ignore_empty_frames && frame.is_empty_text() {
            return Ok(());
        }

        let boxed = tag_box(&frame.text);
        let escaped = escape_xml_text(&boxed, USE_XML10_ESCAPE, false, false);
        let text = tag_unbox(&escaped);

        write!(
            self.sink,
            "{} --> {}{nl}{}{nl}{nl}",
            format_vtt_time(frame.start),
            format_vtt_time(frame.end),
            text,
            nl = NEW_LINE,
        )?;

        Ok(())
    }
}
