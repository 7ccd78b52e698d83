//! Common regex patterns for fuel receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric dates; which of the first two groups is the month depends on DateOrder
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[/\-](\d{1,2})[/\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})\b"
    ).unwrap();

    // "Apr 12, 2024", "April 12th 2024"
    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[ \t]+(\d{1,2})(?:st|nd|rd|th)?,?[ \t]+(\d{4})\b"
    ).unwrap();

    // "12 Apr 2024", "12th April, 2024"
    pub static ref DATE_DAY_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?[ \t]+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?[ \t]+(\d{4})\b"
    ).unwrap();

    pub static ref DATE_LABEL: Regex = Regex::new(
        r"(?i)\bdate\b[ \t]*[:#]?[ \t]*([^\n]+)"
    ).unwrap();

    // HH:MM[:SS] [AM/PM]
    pub static ref TIME: Regex = Regex::new(
        r"(\d{1,2}):(\d{2})(?::(\d{2}))?(?:[ \t]*([AaPp])\.?[ \t]?[Mm]\b\.?)?"
    ).unwrap();

    pub static ref TIME_LABEL: Regex = Regex::new(
        r"(?i)\btime\b[ \t]*[:#]?[ \t]*([^\n]+)"
    ).unwrap();

    // Unit token before the number: "Gallons: 12.500"
    pub static ref GALLONS_UNIT_BEFORE: Regex = Regex::new(
        r"(?i)\b(?:gallons?|gals?)\b\.?[ \t]*[:=]?[ \t]*(\d+(?:\.\d+)?)\b"
    ).unwrap();

    // Unit token after the number: "12.500 G", "12.5 gal"
    pub static ref GALLONS_UNIT_AFTER: Regex = Regex::new(
        r"\b(\d+(?:\.\d+)?)[ \t]*(?:(?i:gallons?|gals?)|G)\b"
    ).unwrap();

    // Labeled per-gallon price: "Price/Gal: $3.599", "PPG 3.59", "@ $3.599"
    pub static ref UNIT_PRICE_LABELED: Regex = Regex::new(
        r"(?i)(?:\bprice[ \t]*(?:/|per)[ \t]*gal(?:lon)?\b|\bppg\b|\bunit[ \t]+price\b|\bprice\b|@)[ \t]*[:=]?[ \t]*(?:usd[ \t]*)?\$?[ \t]*(\d+\.\d{2,3})\b"
    ).unwrap();

    // Per-gallon suffix: "$3.599/gal", "3.59 per gallon"
    pub static ref UNIT_PRICE_SUFFIX: Regex = Regex::new(
        r"(?i)(?:usd[ \t]*)?\$?[ \t]*(\d+\.\d{2,3})[ \t]*(?:/|per\b)[ \t]*gal(?:lon)?\b"
    ).unwrap();

    // Labeled total: "Total: $45.00", "TOTAL SALE 45.00", "Amount Due USD 45.00"
    pub static ref TOTAL_LABELED: Regex = Regex::new(
        r"(?i)\b(?:total(?:[ \t]+(?:sale|due|amount|price))*|amount(?:[ \t]+due)?|fuel[ \t]+sale|sale|balance[ \t]+due)\b[ \t]*[:=]?[ \t]*(?:usd[ \t]*)?\$?[ \t]*(\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2})\b"
    ).unwrap();

    // Currency-marked amounts without a keyword
    pub static ref CURRENCY_PREFIXED: Regex = Regex::new(
        r"(?i)(?:\$|\busd\b)[ \t]*(\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2,3})\b"
    ).unwrap();

    pub static ref CURRENCY_SUFFIXED: Regex = Regex::new(
        r"(?i)\b(\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2,3})[ \t]*usd\b"
    ).unwrap();

    // Odometer keyword before the reading: "Odometer: 55230", "ODO 55,230"
    pub static ref ODOMETER_KEYWORD_BEFORE: Regex = Regex::new(
        r"(?i)\b(?:odometer|odo|mileage|miles)\b\.?[ \t]*(?:reading\b)?[ \t]*[:#=]?[ \t]*(\d{1,3}(?:,\d{3})+|\d+)\b"
    ).unwrap();

    // Odometer keyword after the reading: "55230 mi", "55,230 miles"
    pub static ref ODOMETER_KEYWORD_AFTER: Regex = Regex::new(
        r"(?i)\b(\d{1,3}(?:,\d{3})+|\d+)[ \t]*(?:mi|miles|odo)\b"
    ).unwrap();

    pub static ref ADDRESS_LABEL: Regex = Regex::new(
        r"(?i)\baddress\b[ \t]*[:#]?[ \t]*([^\n]+)"
    ).unwrap();

    // Street number, up to four name tokens, the last street suffix, then optional
    // comma-separated city/state segments and ZIP code
    pub static ref STREET_ADDRESS: Regex = Regex::new(concat!(
        r"\b\d{1,6}(?:[ ]+(?:[A-Za-z][A-Za-z'\-]*\.?|\d{1,4}(?:st|nd|rd|th))){0,4}[ ]+",
        r"(?i:street|st|avenue|ave|road|rd|boulevard|blvd|drive|dr|lane|ln|way|highway|hwy|",
        r"parkway|pkwy|court|ct|place|pl|circle|cir|terrace|ter|trail|trl|route|rte|pike|square|sq)\b\.?",
        r"(?:,[ ]*[A-Za-z][A-Za-z.'\-]*(?:[ ][A-Za-z][A-Za-z.'\-]*)*(?:[ ]+\d{5}(?:-\d{4})?)?)*",
        r"(?:[ ]+\d{5}(?:-\d{4})?)?"
    )).unwrap();

    // Invoice / receipt number: "Invoice #10023", "Receipt No. 4471-A"
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:invoice|inv|receipt|ticket)\b\.?[ \t]*(?:no\b\.?|num(?:ber)?\b|#)?[ \t]*[:#]?[ \t]*(\d[0-9A-Za-z\-]*)"
    ).unwrap();
}
