// Action layer: one function per provisioning step.
//
// Each function reads the variables it needs, builds a path and payload,
// makes exactly one call through `ApiClient` and reports an `Outcome`.
// Result objects are not inspected; the transport layer already echoed
// them and turned every failure into an `Error`.

use crate::api::{
    ApiClient, CreateTrunkRequest, Destination, DestinationsRequest, PhoneNumberRequest, Setting,
    SettingsRequest, Transport, WhitelistIpRequest,
};
use crate::config::{
    VarSource, DEFAULT_NSO_CODE, DEFAULT_TRUNK_NAME, DEFAULT_WHITELIST_MASK, DID_NUMBER, EXOPHONE,
    NSO_CODE, TRUNK_DEST_IP, TRUNK_DEST_PORT, TRUNK_NAME, TRUNK_SID, WHITELIST_IP, WHITELIST_MASK,
};
use crate::error::Result;

const TRUNK_SID_HINT: &str = "Set it in your .env file after creating a trunk.";
const ENV_FILE_HINT: &str = "Set it in your .env file.";
const DEST_HINT: &str = "Set TRUNK_DEST_IP and TRUNK_DEST_PORT in your .env file.";

/// Setting name the API uses for a trunk's external alias.
pub const ALIAS_SETTING: &str = "trunk_external_alias";

/// How an action finished when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The call went through; carries the success line to print.
    Completed(&'static str),
    /// Nothing was sent because an optional input was missing.
    Skipped(String),
}

/// Signalling transport of a destination URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SipTransport {
    Udp,
    Tcp,
    Tls,
}

impl SipTransport {
    /// `ip:port` for UDP, `ip:port;transport=tcp|tls` otherwise.
    pub fn destination(self, ip: &str, port: &str) -> String {
        match self {
            SipTransport::Udp => format!("{ip}:{port}"),
            SipTransport::Tcp => format!("{ip}:{port};transport=tcp"),
            SipTransport::Tls => format!("{ip}:{port};transport=tls"),
        }
    }

    fn label(self) -> &'static str {
        match self {
            SipTransport::Udp => "UDP",
            SipTransport::Tcp => "TCP",
            SipTransport::Tls => "TLS",
        }
    }

    fn done(self) -> &'static str {
        match self {
            SipTransport::Udp => "UDP destination added successfully!",
            SipTransport::Tcp => "TCP destination added successfully!",
            SipTransport::Tls => "TLS destination added successfully!",
        }
    }
}

fn trunk_sid(vars: &impl VarSource) -> Result<String> {
    vars.require(TRUNK_SID, TRUNK_SID_HINT)
}

/// `POST /trunks`. Name and NSO code fall back to their defaults; the
/// domain is derived from the account.
pub fn create_trunk<T: Transport, V: VarSource>(api: &ApiClient<T>, vars: &V) -> Result<Outcome> {
    let payload = CreateTrunkRequest {
        trunk_name: vars.get_or(TRUNK_NAME, DEFAULT_TRUNK_NAME),
        nso_code: vars.get_or(NSO_CODE, DEFAULT_NSO_CODE),
        domain_name: api.config().pstn_domain(),
    };
    println!("Creating trunk...");
    api.post("/trunks", &payload)?;
    Ok(Outcome::Completed("Trunk created successfully!"))
}

/// `DELETE /trunks?trunk_sid={sid}`
pub fn delete_trunk<T: Transport, V: VarSource>(api: &ApiClient<T>, vars: &V) -> Result<Outcome> {
    let sid = trunk_sid(vars)?;
    println!("Deleting trunk {sid}...");
    api.delete(&format!("/trunks?trunk_sid={sid}"))?;
    Ok(Outcome::Completed("Trunk deleted successfully!"))
}

/// `POST /trunks/{sid}/destination-uris` with a single destination.
pub fn add_destination<T: Transport, V: VarSource>(
    api: &ApiClient<T>,
    vars: &V,
    transport: SipTransport,
) -> Result<Outcome> {
    let sid = trunk_sid(vars)?;
    let ip = vars.require(TRUNK_DEST_IP, DEST_HINT)?;
    let port = vars.require(TRUNK_DEST_PORT, DEST_HINT)?;
    let destination = transport.destination(&ip, &port);

    println!(
        "Adding {} destination {destination} to trunk {sid}...",
        transport.label()
    );
    let payload = DestinationsRequest {
        destinations: vec![Destination { destination }],
    };
    api.post(&format!("/trunks/{sid}/destination-uris"), &payload)?;
    Ok(Outcome::Completed(transport.done()))
}

pub fn add_destination_udp<T: Transport, V: VarSource>(
    api: &ApiClient<T>,
    vars: &V,
) -> Result<Outcome> {
    add_destination(api, vars, SipTransport::Udp)
}

pub fn add_destination_tcp<T: Transport, V: VarSource>(
    api: &ApiClient<T>,
    vars: &V,
) -> Result<Outcome> {
    add_destination(api, vars, SipTransport::Tcp)
}

pub fn add_destination_tls<T: Transport, V: VarSource>(
    api: &ApiClient<T>,
    vars: &V,
) -> Result<Outcome> {
    add_destination(api, vars, SipTransport::Tls)
}

/// `POST /trunks/{sid}/phone-numbers`
pub fn map_did<T: Transport, V: VarSource>(api: &ApiClient<T>, vars: &V) -> Result<Outcome> {
    let sid = trunk_sid(vars)?;
    let did = vars.require(DID_NUMBER, ENV_FILE_HINT)?;
    println!("Mapping DID {did} to trunk {sid}...");
    let payload = PhoneNumberRequest { phone_number: did };
    api.post(&format!("/trunks/{sid}/phone-numbers"), &payload)?;
    Ok(Outcome::Completed("DID mapped successfully!"))
}

/// `POST /trunks/{sid}/settings`. Skipped, without any request, when
/// `EXOPHONE` is not set.
pub fn set_trunk_alias<T: Transport, V: VarSource>(
    api: &ApiClient<T>,
    vars: &V,
) -> Result<Outcome> {
    let sid = trunk_sid(vars)?;
    let Some(exophone) = vars.value(EXOPHONE) else {
        return Ok(Outcome::Skipped(
            "EXOPHONE is not set. Skipping trunk alias configuration.".into(),
        ));
    };

    println!("Setting trunk alias {exophone} for trunk {sid}...");
    let payload = SettingsRequest {
        settings: vec![Setting {
            name: ALIAS_SETTING.into(),
            value: exophone,
        }],
    };
    api.post(&format!("/trunks/{sid}/settings"), &payload)?;
    Ok(Outcome::Completed("Trunk alias set successfully!"))
}

/// `POST /trunks/{sid}/whitelisted-ips`
pub fn whitelist_ip<T: Transport, V: VarSource>(api: &ApiClient<T>, vars: &V) -> Result<Outcome> {
    let sid = trunk_sid(vars)?;
    let ip = vars.require(WHITELIST_IP, ENV_FILE_HINT)?;
    let mask = vars.get_u32_or(WHITELIST_MASK, DEFAULT_WHITELIST_MASK)?;

    println!("Whitelisting IP {ip}/{mask} for trunk {sid}...");
    let payload = WhitelistIpRequest { ip, mask };
    api.post(&format!("/trunks/{sid}/whitelisted-ips"), &payload)?;
    Ok(Outcome::Completed("IP whitelisted successfully!"))
}

/// `GET /trunks/{sid}/credentials`
pub fn get_credentials<T: Transport, V: VarSource>(
    api: &ApiClient<T>,
    vars: &V,
) -> Result<Outcome> {
    let sid = trunk_sid(vars)?;
    println!("Getting credentials for trunk {sid}...");
    api.get(&format!("/trunks/{sid}/credentials"))?;
    Ok(Outcome::Completed("Credentials retrieved successfully!"))
}

/// `GET /trunks/{sid}/destination-uris`
pub fn get_destination_uris<T: Transport, V: VarSource>(
    api: &ApiClient<T>,
    vars: &V,
) -> Result<Outcome> {
    let sid = trunk_sid(vars)?;
    println!("Getting destination URIs for trunk {sid}...");
    api.get(&format!("/trunks/{sid}/destination-uris"))?;
    Ok(Outcome::Completed("Destination URIs retrieved successfully!"))
}

/// Phone numbers of a trunk.
///
/// Reads the same `/destination-uris` path as [`get_destination_uris`].
/// TODO: move to `GET /trunks/{sid}/phone-numbers` once that listing is
/// confirmed on the API side.
pub fn get_phone_numbers<T: Transport, V: VarSource>(
    api: &ApiClient<T>,
    vars: &V,
) -> Result<Outcome> {
    let sid = trunk_sid(vars)?;
    println!("Getting phone numbers for trunk {sid}...");
    api.get(&format!("/trunks/{sid}/destination-uris"))?;
    Ok(Outcome::Completed("Phone numbers retrieved successfully!"))
}

/// `GET /trunks/{sid}/whitelisted-ips`
pub fn get_whitelisted_ips<T: Transport, V: VarSource>(
    api: &ApiClient<T>,
    vars: &V,
) -> Result<Outcome> {
    let sid = trunk_sid(vars)?;
    println!("Getting whitelisted IPs for trunk {sid}...");
    api.get(&format!("/trunks/{sid}/whitelisted-ips"))?;
    Ok(Outcome::Completed("Whitelisted IPs retrieved successfully!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_formats() {
        assert_eq!(SipTransport::Udp.destination("10.0.0.5", "5060"), "10.0.0.5:5060");
        assert_eq!(
            SipTransport::Tcp.destination("10.0.0.5", "5060"),
            "10.0.0.5:5060;transport=tcp"
        );
        assert_eq!(
            SipTransport::Tls.destination("10.0.0.5", "5061"),
            "10.0.0.5:5061;transport=tls"
        );
    }
}
