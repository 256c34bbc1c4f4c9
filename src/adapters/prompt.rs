use crate::core::aggregator::{MAX_GRADE, MIN_GRADE};
use crate::core::parser::parse_decimal;
use crate::core::{AggregateResult, Course, GradeSource, Prompter, Selection};
use crate::utils::error::{GradeCalcError, Result};
use async_trait::async_trait;
use std::io::{BufRead, Write};
use std::sync::Mutex;

/// Line-oriented prompts over any reader/writer pair; re-asks until the
/// answer is valid and treats end of input as cancellation.
pub struct StdioPrompter<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl StdioPrompter<std::io::BufReader<std::io::Stdin>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "? {} ", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(GradeCalcError::PromptCancelled {
                message: format!("no answer for '{}'", prompt),
            });
        }
        Ok(line.trim().to_string())
    }

    fn list(&mut self, options: &[String]) -> Result<()> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {:>3}) {}", i + 1, option)?;
        }
        Ok(())
    }
}

/// Parses `1,3-5 7` style answers into sorted zero-based indices.
pub fn parse_index_list(answer: &str, count: usize) -> Option<Vec<usize>> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("all") {
        return Some((0..count).collect());
    }

    let mut indices = Vec::new();
    for part in answer
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
    {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (
                start.trim().parse::<usize>().ok()?,
                end.trim().parse::<usize>().ok()?,
            ),
            None => {
                let single = part.parse::<usize>().ok()?;
                (single, single)
            }
        };
        if start == 0 || end > count || start > end {
            return None;
        }
        indices.extend(start - 1..end);
    }

    indices.sort_unstable();
    indices.dedup();
    Some(indices)
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn ask_integer(&mut self, prompt: &str, min: i64, max: i64) -> Result<i64> {
        loop {
            let answer = self.ask(&format!("{} ({}-{}):", prompt, min, max))?;
            match answer.parse::<i64>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(value),
                _ => writeln!(self.writer, "  Please enter a number between {} and {}.", min, max)?,
            }
        }
    }

    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        if options.is_empty() {
            return Err(GradeCalcError::invalid_parameter("options", "[]", "nothing to choose from"));
        }
        writeln!(self.writer, "{}", prompt)?;
        self.list(options)?;
        let choice = self.ask_integer("Choice", 1, options.len() as i64)?;
        Ok(choice as usize - 1)
    }

    fn multi_select(&mut self, prompt: &str, options: &[String]) -> Result<Vec<usize>> {
        writeln!(self.writer, "{}", prompt)?;
        self.list(options)?;
        loop {
            let answer = self.ask("Numbers or ranges (e.g. 1,3-5), 'all', empty for none:")?;
            match parse_index_list(&answer, options.len()) {
                Some(indices) => return Ok(indices),
                None => writeln!(
                    self.writer,
                    "  Use numbers between 1 and {} separated by commas.",
                    options.len()
                )?,
            }
        }
    }

    fn ask_decimal(&mut self, prompt: &str, min: f64, max: f64) -> Result<f64> {
        loop {
            let answer = self.ask(prompt)?;
            match parse_decimal(&answer) {
                Some(value) if value >= min && value <= max => return Ok(value),
                Some(_) => writeln!(self.writer, "  Please enter a value between {} and {}.", min, max)?,
                None => writeln!(self.writer, "  Please enter a valid number.")?,
            }
        }
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message)?;
        Ok(())
    }
}

/// Asks the user which courses they take and the grade for each.
pub struct InteractiveGradeSource<P: Prompter + Send> {
    prompter: Mutex<P>,
}

impl<P: Prompter + Send> InteractiveGradeSource<P> {
    pub fn new(prompter: P) -> Self {
        Self {
            prompter: Mutex::new(prompter),
        }
    }

    pub fn into_inner(self) -> P {
        self.prompter.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn collect_blocking(&self, courses: &[Course]) -> Result<Selection> {
        let mut prompter = self
            .prompter
            .lock()
            .map_err(|_| GradeCalcError::PromptCancelled {
                message: "prompt state poisoned".to_string(),
            })?;

        let options: Vec<String> = courses.iter().map(Course::display_name).collect();
        let chosen = prompter.multi_select(
            "Select the subjects you are taking this semester:",
            &options,
        )?;
        if chosen.is_empty() {
            return Ok(Selection::new());
        }

        prompter.say(&format!(
            "Enter grades for {} subject(s), grades below 5 are failing",
            chosen.len()
        ))?;

        let mut selection = Selection::new();
        for index in chosen {
            let course = &courses[index];
            let grade = loop {
                let grade = prompter.ask_decimal(
                    &format!("Grade for {}:", course.display_name()),
                    MIN_GRADE,
                    MAX_GRADE,
                )?;
                if grade > MIN_GRADE {
                    break grade;
                }
                prompter.say("  A grade of 0 cannot be averaged, enter a value above 0.")?;
            };

            if grade >= AggregateResult::PASSING_GRADE {
                prompter.say(&format!("  ✓ Passing grade: {}", grade))?;
            } else {
                prompter.say(&format!("  ✗ Failing grade: {} (will lower your average)", grade))?;
            }
            selection.insert(index, grade);
        }

        Ok(selection)
    }
}

#[async_trait]
impl<P: Prompter + Send> GradeSource for InteractiveGradeSource<P> {
    async fn collect(&self, courses: &[Course]) -> Result<Selection> {
        self.collect_blocking(courses)
    }
}
