//! Reading and writing recorded interactions.
//!
//! Each interaction is stored as a `## Interaction N: METHOD URI` section
//! followed by the request headers, request body, response headers and the
//! response body (with its status code), each inside a fenced block.

pub mod error;

use crate::{util, InteractionData, RequestData, ResponseData};
use error::Error;
use fs::File;
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::{BufWriter, Write},
    path::Path,
};

lazy_static! {
    static ref HEADER_REGEX: Regex =
        Regex::new(r"(?m)(?P<header_key>[a-zA-Z0-9\-]+): (?P<header_value>.*?)$").unwrap();
    static ref INTERACTION_HEADING_REGEX: Regex = Regex::new(r"(?m)^## Interaction ").unwrap();
    static ref MARKDOWN_REGEX: Regex = Regex::new(
        "(?ms)\
            \\A\\#\\# Interaction (?P<interaction_number>[0-9]+): (?P<http_method>[A-Z]+) (?P<uri>[^ \r\n]*)\
            .*?\\#\\#\\# Request headers recorded for playback.*?\
            ```\\s*(?P<request_headers_part>.*?)\\s*```.*?\
            \\#\\#\\# Request body recorded for playback.*?\
            ```\\s*(?P<request_body_part>.*?)\\s*```.*?\
            \\#\\#\\# Response headers recorded for playback.*?\
            ```\\s*(?P<response_headers_part>.*?)\\s*```.*?\
            \\#\\#\\# Response body recorded for playback \\((?P<status_code>[0-9]+)[^)]*\\).*?\
            ```\\s*(?P<response_body_part>.*?)\\s*```"
    )
    .unwrap();
}

pub fn load_markdown<P: AsRef<Path>>(filename: P) -> Result<Vec<InteractionData>, Error> {
    let file_contents = fs::read_to_string(filename)?;

    parse_markdown(&file_contents)
}

pub fn parse_markdown(file_contents: &str) -> Result<Vec<InteractionData>, Error> {
    let mut data = Vec::new();

    let starts = INTERACTION_HEADING_REGEX
        .find_iter(file_contents)
        .map(|heading| heading.start())
        .collect::<Vec<_>>();
    let ends = starts
        .iter()
        .skip(1)
        .copied()
        .chain(std::iter::once(file_contents.len()));

    // one section per interaction heading
    for (start, end) in starts.iter().copied().zip(ends) {
        let captures = MARKDOWN_REGEX
            .captures(&file_contents[start..end])
            .ok_or(Error::InvalidMarkdownFormat)?;

        let interaction_number = captures["interaction_number"]
            .parse()
            .map_err(|_| Error::InvalidInteractionNumber)?;
        let status_code = captures["status_code"]
            .parse()
            .map_err(|_| Error::InvalidStatusCode)?;

        data.push(InteractionData {
            interaction_number,
            request_data: RequestData {
                uri: captures["uri"].into(),
                method: captures["http_method"].into(),
                headers: parse_headers(&captures["request_headers_part"]),
                body: captures["request_body_part"].into(),
            },
            response_data: ResponseData {
                status_code,
                headers: parse_headers(&captures["response_headers_part"]),
                body: captures["response_body_part"].into(),
            },
        });
    }

    if data.is_empty() {
        Err(Error::InvalidMarkdownFormat)
    } else {
        Ok(data)
    }
}

fn parse_headers<T: AsRef<str>>(headers_part: T) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for capture in HEADER_REGEX.captures_iter(headers_part.as_ref()) {
        headers.insert(
            String::from(capture["header_key"].trim()),
            String::from(capture["header_value"].trim()),
        );
    }

    headers
}

pub fn save_interactions<'a, P: AsRef<Path>, I: IntoIterator<Item = &'a InteractionData>>(
    markdown_path: P,
    interactions: I,
) -> Result<(), Error> {
    let mut file = BufWriter::new(File::create(markdown_path.as_ref())?);

    for (number, interaction) in interactions.into_iter().enumerate() {
        write!(
            file,
            "## Interaction {}: {} {}\r\n\r\n",
            number, interaction.request_data.method, interaction.request_data.uri
        )?;
        write!(
            file,
            "### Request headers recorded for playback:\r\n\r\n```\r\n"
        )?;
        // sorted so that re-recording produces stable files
        for (key, value) in sorted(&interaction.request_data.headers) {
            write!(file, "{}: {}\r\n", key, value)?;
        }
        write!(file, "```\r\n\r\n")?;

        write!(
            file,
            "### Request body recorded for playback ({}):\r\n\r\n```\r\n{}\r\n```\r\n\r\n",
            interaction
                .request_data
                .headers
                .get("content-type")
                .map(String::as_str)
                .unwrap_or(""),
            &interaction.request_data.body,
        )?;
        write!(
            file,
            "### Response headers recorded for playback:\r\n\r\n```\r\n"
        )?;
        for (key, value) in sorted(&interaction.response_data.headers) {
            write!(file, "{}: {}\r\n", key, value)?;
        }
        write!(file, "```\r\n\r\n")?;
        write!(
            file,
            "### Response body recorded for playback ({}: {}):\r\n\r\n```\r\n{}\r\n```\r\n\r\n",
            interaction.response_data.status_code,
            interaction
                .response_data
                .headers
                .get("content-type")
                .map(String::as_str)
                .unwrap_or(""),
            &interaction.response_data.body
        )?;
    }

    file.flush()?;

    Ok(())
}

fn sorted(headers: &HashMap<String, String>) -> BTreeMap<&String, &String> {
    headers.iter().collect()
}

/// Returns `true` when `markdown_path` already holds exactly `interactions`.
pub fn check_markdown_data_unchanged<
    'a,
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a InteractionData>,
>(
    markdown_path: P,
    interactions: I,
) -> Result<bool, Error> {
    let markdown_data = load_markdown(markdown_path)?;
    let interactions = interactions.into_iter().collect::<Vec<_>>();

    if interactions.len() != markdown_data.len() {
        return Ok(false);
    }

    for (interaction_data, markdown_data) in interactions.into_iter().zip(markdown_data.iter()) {
        if markdown_data.request_data.method != interaction_data.request_data.method
            || markdown_data.request_data.uri != interaction_data.request_data.uri
            || markdown_data.response_data.status_code
                != interaction_data.response_data.status_code
            || !util::bodies_equal(
                &markdown_data.request_data.body,
                &interaction_data.request_data.body,
            )
            || !util::bodies_equal(
                &markdown_data.response_data.body,
                &interaction_data.response_data.body,
            )
            || !headers_equal(
                &markdown_data.request_data.headers,
                &interaction_data.request_data.headers,
            )
            || !headers_equal(
                &markdown_data.response_data.headers,
                &interaction_data.response_data.headers,
            )
        {
            return Ok(false);
        }
    }

    Ok(true)
}

fn headers_equal(lhs: &HashMap<String, String>, rhs: &HashMap<String, String>) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    for (key, value) in lhs {
        match rhs.get(key) {
            Some(header) => {
                if header.trim() != value.trim() {
                    return false;
                }
            }
            None => return false,
        };
    }

    true
}
