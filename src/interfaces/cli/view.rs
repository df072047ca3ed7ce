use crate::application::controller::FlowSnapshot;
use crate::domain::flow::{Step, StepStatus};
use crate::error::Result;
use std::io::Write;

/// Writes a flow snapshot as text or JSON.
///
/// The text form is a progress line followed by whichever of the quote,
/// payment, job output and error are present.
pub struct FlowView<W: Write> {
    writer: W,
}

impl<W: Write> FlowView<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_text(&mut self, snapshot: &FlowSnapshot) -> std::io::Result<()> {
        writeln!(self.writer, "{}", progress_line(&snapshot.steps))?;
        writeln!(self.writer, "state: {}", state_label(snapshot))?;

        if let Some(quote) = &snapshot.quote {
            writeln!(
                self.writer,
                "quote: {} {} (job {})",
                quote.price, quote.currency, quote.job_id
            )?;
        }
        if let Some(payment) = &snapshot.payment_result {
            let outcome = if payment.success { "paid" } else { "declined" };
            writeln!(
                self.writer,
                "payment: {} ({})",
                outcome, payment.transaction_id
            )?;
        }
        if let Some(job) = &snapshot.job_result {
            writeln!(self.writer, "result:")?;
            for line in job.output.lines() {
                writeln!(self.writer, "  {}", line)?;
            }
        }
        if let Some(error) = &snapshot.error {
            writeln!(self.writer, "error: {}", error)?;
        }
        self.writer.flush()
    }

    pub fn write_json(&mut self, snapshot: &FlowSnapshot) -> Result<()> {
        serde_json::to_writer(&mut self.writer, snapshot)?;
        writeln!(self.writer).map_err(serde_json::Error::io)?;
        Ok(())
    }
}

fn state_label(snapshot: &FlowSnapshot) -> String {
    serde_json::to_value(snapshot.state)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", snapshot.state))
}

/// One marker per step: `[x]` completed, `[>]` active, `[ ]` pending.
pub fn progress_line(steps: &[StepStatus; 5]) -> String {
    Step::ALL
        .iter()
        .zip(steps)
        .map(|(step, status)| {
            let marker = match status {
                StepStatus::Completed => "[x]",
                StepStatus::Active => "[>]",
                StepStatus::Pending => "[ ]",
            };
            format!("{} {}", marker, step.label())
        })
        .collect::<Vec<_>>()
        .join("  ")
}
