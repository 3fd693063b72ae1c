//! SOAP 1.2 envelopes
//!
//! Requests carry one child element per parameter under `<{Op}V1>`.
//! Responses carry the result document in `<{Op}V1Result>`, either as
//! inline markup or as escaped text.

use crate::{Error, Result};
use netgate_core::Parameters;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// NetGate service namespace
pub const NETGATE_NAMESPACE: &str = "https://www.iatspayments.com/NetGate/";

/// SOAP 1.2 envelope namespace
pub const SOAP12_NAMESPACE: &str = "http://www.w3.org/2003/05/soap-envelope";

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// SOAP action URI of an operation
pub fn soap_action(operation: &str) -> String {
    format!("{}{}", NETGATE_NAMESPACE, operation)
}

/// `Content-Type` header for an operation
pub fn content_type(operation: &str) -> String {
    format!(
        "application/soap+xml; charset=utf-8; action=\"{}\"",
        soap_action(operation)
    )
}

/// Write the request envelope for `operation`
pub fn build_request(operation: &str, parameters: &Parameters) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;

    let mut envelope = BytesStart::new("soap12:Envelope");
    envelope.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
    envelope.push_attribute(("xmlns:xsd", XSD_NAMESPACE));
    envelope.push_attribute(("xmlns:soap12", SOAP12_NAMESPACE));
    write(&mut writer, Event::Start(envelope))?;
    write(&mut writer, Event::Start(BytesStart::new("soap12:Body")))?;

    let mut body = BytesStart::new(operation);
    body.push_attribute(("xmlns", NETGATE_NAMESPACE));
    write(&mut writer, Event::Start(body))?;

    for (name, value) in parameters.iter() {
        write_element(&mut writer, name, &value.to_wire())?;
    }

    write(&mut writer, Event::End(BytesEnd::new(operation)))?;
    write(&mut writer, Event::End(BytesEnd::new("soap12:Body")))?;
    write(&mut writer, Event::End(BytesEnd::new("soap12:Envelope")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| Error::Xml(e.to_string()))
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(tag)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Xml(e.to_string()))
}

/// Pull the result document out of a response envelope
///
/// A SOAP fault anywhere in the body becomes [`Error::SoapFault`]; a body
/// without the result field is a malformed document.
pub fn extract_result(body: &str, result_field: &str) -> Result<String> {
    let mut reader = Reader::from_str(body);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let local = e.local_name();
                if local.as_ref() == b"Fault" {
                    return Err(read_fault(&mut reader)?);
                }
                if local.as_ref() == result_field.as_bytes() {
                    let end = e.name().as_ref().to_vec();
                    let inner = reader.read_text(QName(&end))?;
                    return inner_document(&inner);
                }
            }
            Event::Empty(e) if e.local_name().as_ref() == result_field.as_bytes() => {
                return Ok(String::new());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(Error::Core(netgate_core::Error::MalformedDocument(format!(
        "response has no {} element",
        result_field
    ))))
}

/// Fail with [`Error::SoapFault`] if `body` is a SOAP fault
///
/// Bodies that are not XML at all are left to the caller.
pub fn check_fault(body: &str) -> Result<()> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"Fault" => {
                return Err(read_fault(&mut reader)?);
            }
            Ok(Event::Eof) | Err(_) => return Ok(()),
            Ok(_) => {}
        }
    }
}

fn inner_document(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if let Some(cdata) = trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
    {
        return Ok(cdata.to_string());
    }
    if trimmed.starts_with('<') {
        return Ok(trimmed.to_string());
    }
    let text = unescape(trimmed).map_err(quick_xml::Error::from)?;
    Ok(text.into_owned())
}

// Handles both SOAP 1.2 (Code/Value, Reason/Text) and 1.1
// (faultcode, faultstring) layouts.
fn read_fault(reader: &mut Reader<&[u8]>) -> Result<Error> {
    let mut code = None;
    let mut reason = None;
    let mut current = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => current = e.local_name().as_ref().to_vec(),
            Event::Text(t) => {
                let text = t.unescape()?.trim().to_string();
                if text.is_empty() {
                    continue;
                }
                match current.as_slice() {
                    b"Value" | b"faultcode" if code.is_none() => code = Some(text),
                    b"Text" | b"faultstring" if reason.is_none() => reason = Some(text),
                    _ => {}
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"Fault" {
                    break;
                }
                current.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Error::SoapFault {
        code: code.unwrap_or_default(),
        reason: reason.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use netgate_core::types::CLIENT_IP_FIELD;

    fn response(result_field: &str, inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body>
    <ProcessCreditCardV1Response xmlns="https://www.iatspayments.com/NetGate/">
      <{f}>{inner}</{f}>
    </ProcessCreditCardV1Response>
  </soap:Body>
</soap:Envelope>"#,
            f = result_field,
            inner = inner
        )
    }

    #[test]
    fn test_request_envelope() {
        let params = Parameters::new()
            .with("agentCode", "TEST88")
            .with("comment", "fish & chips <large>")
            .with(CLIENT_IP_FIELD, "");
        let xml = build_request("ProcessCreditCardV1", &params).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("xmlns:soap12=\"http://www.w3.org/2003/05/soap-envelope\""));
        assert!(xml.contains(
            "<ProcessCreditCardV1 xmlns=\"https://www.iatspayments.com/NetGate/\"><agentCode>TEST88</agentCode>"
        ));
        assert!(xml.contains("<comment>fish &amp; chips &lt;large&gt;</comment>"));
        assert!(xml.contains("<customerIPAddress></customerIPAddress>"));
        assert!(xml.ends_with("</soap12:Body></soap12:Envelope>"));
    }

    #[test]
    fn test_content_type_carries_action() {
        assert_eq!(
            content_type("GetCustomerListV1"),
            "application/soap+xml; charset=utf-8; action=\"https://www.iatspayments.com/NetGate/GetCustomerListV1\""
        );
    }

    #[test]
    fn test_extract_inline_markup() {
        let body = response(
            "ProcessCreditCardV1Result",
            "<IATSRESPONSE><STATUS>Success</STATUS></IATSRESPONSE>",
        );
        let inner = extract_result(&body, "ProcessCreditCardV1Result").unwrap();
        assert_eq!(inner, "<IATSRESPONSE><STATUS>Success</STATUS></IATSRESPONSE>");
    }

    #[test]
    fn test_extract_escaped_text() {
        let body = response(
            "ProcessCreditCardV1Result",
            "&lt;IATSRESPONSE&gt;&lt;STATUS&gt;Success&lt;/STATUS&gt;&lt;/IATSRESPONSE&gt;",
        );
        let inner = extract_result(&body, "ProcessCreditCardV1Result").unwrap();
        assert_eq!(inner, "<IATSRESPONSE><STATUS>Success</STATUS></IATSRESPONSE>");
    }

    #[test]
    fn test_extract_missing_field_is_malformed() {
        let body = response("SomethingElse", "x");
        let err = extract_result(&body, "ProcessCreditCardV1Result").unwrap_err();
        assert!(matches!(
            err,
            Error::Core(netgate_core::Error::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_soap12_fault() {
        let body = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body>
    <soap:Fault>
      <soap:Code><soap:Value>soap:Receiver</soap:Value></soap:Code>
      <soap:Reason><soap:Text xml:lang="en">Server was unable to process request.</soap:Text></soap:Reason>
    </soap:Fault>
  </soap:Body>
</soap:Envelope>"#;

        match extract_result(body, "ProcessCreditCardV1Result") {
            Err(Error::SoapFault { code, reason }) => {
                assert_eq!(code, "soap:Receiver");
                assert_eq!(reason, "Server was unable to process request.");
            }
            other => panic!("expected SOAP fault, got {:?}", other),
        }
        assert!(matches!(check_fault(body), Err(Error::SoapFault { .. })));
    }

    #[test]
    fn test_check_fault_ignores_non_xml() {
        assert!(check_fault("Service Unavailable").is_ok());
        assert!(check_fault(&response("X", "y")).is_ok());
    }
}
