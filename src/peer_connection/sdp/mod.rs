pub mod sdp_type;
pub mod session_description;

use std::collections::HashMap;
use std::sync::Arc;

use sdp::description::common::Attribute;
use sdp::description::media::{MediaDescription, MediaName, RangedPort};
use sdp::description::session::*;
use sdp::extmap::ExtMap;
use sdp::util::ConnectionRole;
use url::Url;

use crate::api::media_engine::MediaEngine;
use crate::dtls_transport::dtls_fingerprint::RTCDtlsFingerprint;
use crate::error::{Error, Result};
use crate::ice_transport::ice_candidate::RTCIceCandidate;
use crate::ice_transport::ice_gatherer::RTCIceGatherer;
use crate::ice_transport::ice_gathering_state::RTCIceGatheringState;
use crate::ice_transport::ice_parameters::RTCIceParameters;
use crate::peer_connection::sdp::session_description::RTCSessionDescription;
use crate::rtp_transceiver::rtp_codec::{
    RTCPFeedback, RTCRtpCodecCapability, RTCRtpCodecParameters, RTPCodecType,
};
use crate::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use crate::rtp_transceiver::{RTCRtpTransceiver, SSRC};

/// SDP_ATTRIBUTE_RID is the attribute key used to advertise simulcast RIDs.
pub(crate) const SDP_ATTRIBUTE_RID: &str = "rid";

/// MEDIA_SECTION_APPLICATION is the `m=` media value used for the SCTP data
/// channel media section.
pub(crate) const MEDIA_SECTION_APPLICATION: &str = "application";

/// TrackDetails represents any media source that can be represented in an
/// SDP. This isn't keyed by SSRC alone since it also needs to support
/// rid-based (simulcast) sources, which can carry several SSRCs (media +
/// RTX repair flow).
#[derive(Default, Debug, Clone)]
pub(crate) struct TrackDetails {
    pub(crate) mid: String,
    pub(crate) kind: RTPCodecType,
    pub(crate) stream_id: String,
    pub(crate) id: String,
    pub(crate) ssrcs: Vec<SSRC>,
    pub(crate) repair_ssrc: SSRC,
    pub(crate) rid: String,
}

pub(crate) fn track_details_for_ssrc(
    track_details: &[TrackDetails],
    ssrc: SSRC,
) -> Option<&TrackDetails> {
    track_details.iter().find(|x| x.ssrcs.contains(&ssrc))
}

pub(crate) fn track_details_for_rid<'a>(
    track_details: &'a [TrackDetails],
    rid: &str,
) -> Option<&'a TrackDetails> {
    track_details.iter().find(|x| x.rid == rid)
}

pub(crate) fn filter_track_with_ssrc(incoming_tracks: &mut Vec<TrackDetails>, ssrc: SSRC) {
    incoming_tracks.retain(|x| !x.ssrcs.contains(&ssrc));
}

/// extract all TrackDetails from an SDP. `exclude_inactive` additionally
/// skips media sections marked `a=inactive`; media sections marked
/// `a=recvonly` are always skipped, since they never describe media we'll
/// receive from the remote peer under a different SSRC/rid.
pub(crate) fn track_details_from_sdp(
    s: &SessionDescription,
    exclude_inactive: bool,
) -> Vec<TrackDetails> {
    let mut incoming_tracks: Vec<TrackDetails> = vec![];
    let mut rtx_repair_flows = HashMap::new();

    for media in &s.media_descriptions {
        let mut stream_id = "";
        let mut track_id = "";

        if media.attribute(ATTR_KEY_RECV_ONLY).is_some() {
            continue;
        }
        if exclude_inactive && media.attribute(ATTR_KEY_INACTIVE).is_some() {
            continue;
        }

        let mid_value = match get_mid_value(media) {
            Some(mid_value) => mid_value,
            None => continue,
        };

        let codec_type = RTPCodecType::from(media.media_name.media.as_str());
        if codec_type == RTPCodecType::Unspecified {
            continue;
        }

        for attr in &media.attributes {
            match attr.key.as_str() {
                ATTR_KEY_SSRCGROUP => {
                    if let Some(value) = &attr.value {
                        let split: Vec<&str> = value.split(' ').collect();
                        if split[0] == SEMANTIC_TOKEN_FLOW_IDENTIFICATION && split.len() == 3 {
                            // `a=ssrc-group:FID 2231627014 632943048` declares that the
                            // second SSRC is an RTX repair flow (RFC4588) for the first,
                            // per RFC5576. Blacklist it so it's never added as its own
                            // track.
                            if split[1].parse::<u32>().is_err() {
                                log::warn!("Failed to parse SSRC: {}", split[1]);
                                continue;
                            }
                            let rtx_repair_flow = match split[2].parse::<u32>() {
                                Ok(n) => n,
                                Err(err) => {
                                    log::warn!("Failed to parse SSRC: {err}");
                                    continue;
                                }
                            };
                            rtx_repair_flows.insert(rtx_repair_flow, true);
                            filter_track_with_ssrc(&mut incoming_tracks, rtx_repair_flow as SSRC);
                        }
                    }
                }

                // `a=msid:<stream_id> <track_label>` for Unified Plan. The first
                // value matches MediaStream.id in the browser.
                ATTR_KEY_MSID => {
                    if let Some(value) = &attr.value {
                        let split: Vec<&str> = value.split(' ').collect();
                        if split.len() == 2 {
                            stream_id = split[0];
                            track_id = split[1];
                        }
                    }
                }

                ATTR_KEY_SSRC => {
                    if let Some(value) = &attr.value {
                        let split: Vec<&str> = value.split(' ').collect();
                        let ssrc = match split[0].parse::<u32>() {
                            Ok(ssrc) => ssrc,
                            Err(err) => {
                                log::warn!("Failed to parse SSRC: {err}");
                                continue;
                            }
                        };

                        if rtx_repair_flows.contains_key(&ssrc) {
                            continue;
                        }

                        if split.len() == 3 && split[1].starts_with("msid:") {
                            stream_id = &split[1]["msid:".len()..];
                            track_id = split[2];
                        }

                        if let Some(track) =
                            incoming_tracks.iter_mut().find(|t| t.ssrcs.contains(&ssrc))
                        {
                            track.mid = mid_value.to_owned();
                            track.kind = codec_type;
                            track.stream_id = stream_id.to_owned();
                            track.id = track_id.to_owned();
                        } else {
                            incoming_tracks.push(TrackDetails {
                                mid: mid_value.to_owned(),
                                kind: codec_type,
                                stream_id: stream_id.to_owned(),
                                id: track_id.to_owned(),
                                ssrcs: vec![ssrc],
                                ..Default::default()
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        let rids = get_rids(media);
        if !rids.is_empty() && !track_id.is_empty() && !stream_id.is_empty() {
            for rid in rids.keys() {
                incoming_tracks.push(TrackDetails {
                    mid: mid_value.to_owned(),
                    kind: codec_type,
                    stream_id: stream_id.to_owned(),
                    id: track_id.to_owned(),
                    rid: rid.to_owned(),
                    ..Default::default()
                });
            }
        }
    }

    incoming_tracks
}

pub(crate) fn get_rids(media: &MediaDescription) -> HashMap<String, String> {
    let mut rids = HashMap::new();
    for attr in &media.attributes {
        if attr.key.as_str() == SDP_ATTRIBUTE_RID {
            if let Some(value) = &attr.value {
                let split: Vec<&str> = value.split(' ').collect();
                rids.insert(split[0].to_owned(), value.to_owned());
            }
        }
    }
    rids
}

pub(crate) fn get_mid_value(media: &MediaDescription) -> Option<&String> {
    for attr in &media.attributes {
        if attr.key == ATTR_KEY_MID {
            return attr.value.as_ref();
        }
    }
    None
}

/// get_peer_direction returns the first RTPTransceiverDirection-shaped
/// attribute key found on a media description, or `Unspecified` if none of
/// its attribute keys name a direction.
pub(crate) fn get_peer_direction(media: &MediaDescription) -> RTCRtpTransceiverDirection {
    for a in &media.attributes {
        let direction = RTCRtpTransceiverDirection::from(a.key.as_str());
        if direction != RTCRtpTransceiverDirection::Unspecified {
            return direction;
        }
    }
    RTCRtpTransceiverDirection::Unspecified
}

/// description_is_plan_b heuristically detects a Plan B remote offer: Plan B
/// mids are a bare media kind (`audio`/`video`/`data`) rather than a
/// negotiated numeric/opaque identifier.
pub(crate) fn description_is_plan_b(desc: Option<&RTCSessionDescription>) -> Result<bool> {
    let desc = match desc {
        Some(d) => d,
        None => return Ok(false),
    };
    let parsed = match &desc.parsed {
        Some(p) => p,
        None => return Ok(false),
    };

    for media in &parsed.media_descriptions {
        if let Some(mid_value) = get_mid_value(media) {
            if matches!(mid_value.to_lowercase().as_str(), "audio" | "video" | "data") {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// update_sdp_origin saves `Origin` in the PeerConnection when creating the
/// first local SDP; on subsequent calls, it restores the saved origin's
/// session ID and bumps the session version by one, per
/// <https://tools.ietf.org/html/draft-ietf-rtcweb-jsep-25#section-5.2.2>.
///
/// Go guards this with atomics because the origin can be read concurrently
/// from multiple goroutines; here the caller already holds the origin behind
/// a `Mutex`, so a plain read-modify-write is enough.
pub(crate) fn update_sdp_origin(origin: &mut Origin, d: &mut SessionDescription) {
    if origin.session_version == 0 {
        origin.session_version = d.origin.session_version;
        origin.session_id = d.origin.session_id;
    } else {
        d.origin.session_id = origin.session_id;
        origin.session_version += 1;
        d.origin.session_version = origin.session_version;
    }
}

/// have_data_channel returns the MediaDescription carrying the SCTP data
/// channel, if the local description has negotiated one.
pub(crate) fn have_data_channel(local_desc: &RTCSessionDescription) -> Option<&MediaDescription> {
    let parsed = local_desc.parsed.as_ref()?;
    parsed
        .media_descriptions
        .iter()
        .find(|d| d.media_name.media == MEDIA_SECTION_APPLICATION)
}

pub(crate) fn have_application_media_section(parsed: &SessionDescription) -> bool {
    parsed
        .media_descriptions
        .iter()
        .any(|m| m.media_name.media == MEDIA_SECTION_APPLICATION)
}

pub(crate) fn get_by_mid<'a>(
    mid: &str,
    desc: &'a RTCSessionDescription,
) -> Option<&'a MediaDescription> {
    let parsed = desc.parsed.as_ref()?;
    parsed.media_descriptions.iter().find(|m| {
        matches!(m.attribute(ATTR_KEY_MID), Some(Some(value)) if value == mid)
    })
}

/// extract_fingerprint pulls the single DTLS fingerprint `hash algorithm` /
/// `value` pair out of a parsed SDP, erroring if the session-level and
/// per-media fingerprints disagree.
pub(crate) fn extract_fingerprint(parsed: &SessionDescription) -> Result<(String, String)> {
    let mut fingerprints = vec![];

    if let Some(fingerprint) = parsed.attribute("fingerprint") {
        fingerprints.push(fingerprint.clone());
    }

    for m in &parsed.media_descriptions {
        if let Some(Some(fingerprint)) = m.attribute("fingerprint") {
            fingerprints.push(fingerprint.to_owned());
        }
    }

    if fingerprints.is_empty() {
        return Err(Error::ErrSessionDescriptionNoFingerprint);
    }

    for f in &fingerprints {
        if f != &fingerprints[0] {
            return Err(Error::ErrSessionDescriptionConflictingFingerprints);
        }
    }

    let parts: Vec<&str> = fingerprints[0].split(' ').collect();
    if parts.len() != 2 {
        return Err(Error::ErrSessionDescriptionInvalidFingerprint);
    }

    Ok((parts[1].to_owned(), parts[0].to_owned()))
}

/// extract_ice_details pulls the remote ufrag/password and any ICE
/// candidates carried inline in the SDP out of a parsed session
/// description.
pub(crate) async fn extract_ice_details(
    parsed: &SessionDescription,
) -> Result<(String, String, Vec<RTCIceCandidate>)> {
    let mut candidates = vec![];
    let mut remote_pwds = vec![];
    let mut remote_ufrags = vec![];

    if let Some(ufrag) = parsed.attribute("ice-ufrag") {
        remote_ufrags.push(ufrag.clone());
    }
    if let Some(pwd) = parsed.attribute("ice-pwd") {
        remote_pwds.push(pwd.clone());
    }

    for m in &parsed.media_descriptions {
        if let Some(Some(ufrag)) = m.attribute("ice-ufrag") {
            remote_ufrags.push(ufrag.to_owned());
        }
        if let Some(Some(pwd)) = m.attribute("ice-pwd") {
            remote_pwds.push(pwd.to_owned());
        }

        for a in &m.attributes {
            if a.is_ice_candidate() {
                if let Some(value) = &a.value {
                    let candidate = ice::candidate::candidate_base::unmarshal_candidate(value)?;
                    let candidate: Arc<dyn ice::candidate::Candidate + Send + Sync> =
                        Arc::new(candidate);
                    candidates.push(RTCIceCandidate::from(&candidate));
                }
            }
        }
    }

    if remote_ufrags.is_empty() {
        return Err(Error::ErrSessionDescriptionMissingIceUfrag);
    } else if remote_pwds.is_empty() {
        return Err(Error::ErrSessionDescriptionMissingIcePwd);
    }

    for u in &remote_ufrags {
        if u != &remote_ufrags[0] {
            return Err(Error::ErrSessionDescriptionConflictingIceUfrag);
        }
    }
    for p in &remote_pwds {
        if p != &remote_pwds[0] {
            return Err(Error::ErrSessionDescriptionConflictingIcePwd);
        }
    }

    Ok((remote_ufrags[0].clone(), remote_pwds[0].clone(), candidates))
}

fn append_candidate_if_new(marshaled: &str, attributes: &[Attribute]) -> bool {
    !attributes
        .iter()
        .any(|a| a.value.as_deref() == Some(marshaled))
}

async fn add_candidates_to_media_description(
    candidates: &[RTCIceCandidate],
    m: &mut MediaDescription,
    ice_gathering_state: RTCIceGatheringState,
) -> Result<()> {
    for c in candidates {
        let candidate = c.to_ice().await?;

        for component in [1u16, 2u16] {
            candidate.set_component(component);
            let marshaled = candidate.marshal();
            if append_candidate_if_new(&marshaled, &m.attributes) {
                *m = std::mem::take(m).with_value_attribute(ATTR_KEY_CANDIDATE.to_owned(), marshaled);
            }
        }
    }

    if ice_gathering_state != RTCIceGatheringState::Complete {
        return Ok(());
    }
    if m.attribute(ATTR_KEY_END_OF_CANDIDATES).is_some() {
        return Ok(());
    }

    *m = std::mem::take(m).with_property_attribute(ATTR_KEY_END_OF_CANDIDATES.to_owned());

    Ok(())
}

/// populate_local_candidates returns a copy of `session_description` with
/// every currently-gathered local ICE candidate appended to its first media
/// section's attributes, re-marshaled. Used to lazily expose trickled
/// candidates from `current_local_description`/`pending_local_description`
/// without mutating the description actually handed to `set_local_description`.
pub(crate) async fn populate_local_candidates(
    session_description: Option<&RTCSessionDescription>,
    ice_gatherer: Option<&Arc<RTCIceGatherer>>,
    ice_gathering_state: RTCIceGatheringState,
) -> Option<RTCSessionDescription> {
    let session_description = session_description?;
    let ice_gatherer = ice_gatherer?;

    let candidates = ice_gatherer.get_local_candidates().await.ok()?;

    let mut parsed = session_description.parsed.clone()?;
    if let Some(m) = parsed.media_descriptions.first_mut() {
        if add_candidates_to_media_description(&candidates, m, ice_gathering_state)
            .await
            .is_err()
        {
            return Some(session_description.clone());
        }
    }

    let sdp = parsed.marshal();

    Some(RTCSessionDescription {
        sdp_type: session_description.sdp_type,
        sdp,
        parsed: Some(parsed),
    })
}

/// MediaSection groups the transceiver(s) (or data channel) that back a
/// single `m=` line being generated.
#[derive(Default, Clone)]
pub(crate) struct MediaSection {
    pub(crate) id: String,
    pub(crate) transceivers: Vec<Arc<RTCRtpTransceiver>>,
    pub(crate) data: bool,
    pub(crate) rid_map: HashMap<String, String>,
}

pub(crate) struct PopulateSdpParams {
    pub(crate) is_plan_b: bool,
    pub(crate) media_description_fingerprint: bool,
    pub(crate) is_icelite: bool,
    pub(crate) connection_role: ConnectionRole,
    pub(crate) ice_gathering_state: RTCIceGatheringState,
}

async fn add_data_media_section(
    d: SessionDescription,
    should_add_candidates: bool,
    dtls_fingerprints: &[RTCDtlsFingerprint],
    mid_value: &str,
    ice_params: &RTCIceParameters,
    candidates: &[RTCIceCandidate],
    dtls_role: ConnectionRole,
    ice_gathering_state: RTCIceGatheringState,
) -> Result<SessionDescription> {
    let mut media = MediaDescription {
        media_name: MediaName {
            media: MEDIA_SECTION_APPLICATION.to_owned(),
            port: RangedPort {
                value: 9,
                range: None,
            },
            protos: vec!["UDP".to_owned(), "DTLS".to_owned(), "SCTP".to_owned()],
            formats: vec!["webrtc-datachannel".to_owned()],
        },
        connection_information: Some(sdp::description::common::ConnectionInformation {
            network_type: "IN".to_owned(),
            address_type: "IP4".to_owned(),
            address: Some(sdp::description::common::Address {
                address: "0.0.0.0".to_owned(),
                ttl: None,
                range: None,
            }),
        }),
        ..Default::default()
    };

    media = media
        .with_value_attribute(ATTR_KEY_CONNECTION_SETUP.to_owned(), dtls_role.to_string())
        .with_value_attribute(ATTR_KEY_MID.to_owned(), mid_value.to_owned())
        .with_property_attribute(RTCRtpTransceiverDirection::Sendrecv.to_string())
        .with_property_attribute("sctp-port:5000".to_owned())
        .with_ice_credentials(
            ice_params.username_fragment.clone(),
            ice_params.password.clone(),
        );

    for f in dtls_fingerprints {
        media = media.with_fingerprint(f.algorithm.clone(), f.value.to_uppercase());
    }

    if should_add_candidates {
        add_candidates_to_media_description(candidates, &mut media, ice_gathering_state).await?;
    }

    Ok(d.with_media(media))
}

async fn add_transceiver_sdp(
    d: SessionDescription,
    is_plan_b: bool,
    should_add_candidates: bool,
    dtls_fingerprints: &[RTCDtlsFingerprint],
    media_engine: &MediaEngine,
    mid_value: &str,
    ice_params: &RTCIceParameters,
    candidates: &[RTCIceCandidate],
    dtls_role: ConnectionRole,
    ice_gathering_state: RTCIceGatheringState,
    media_section: &MediaSection,
) -> Result<(SessionDescription, bool)> {
    let transceivers = &media_section.transceivers;
    let t = match transceivers.first() {
        Some(t) => t,
        None => return Err(Error::ErrSDPZeroTransceivers),
    };

    let mut media = MediaDescription::new_jsep_media_description(t.kind().to_string(), vec![])
        .with_value_attribute(ATTR_KEY_CONNECTION_SETUP.to_owned(), dtls_role.to_string())
        .with_value_attribute(ATTR_KEY_MID.to_owned(), mid_value.to_owned())
        .with_ice_credentials(
            ice_params.username_fragment.clone(),
            ice_params.password.clone(),
        )
        .with_property_attribute(ATTR_KEY_RTCPMUX.to_owned())
        .with_property_attribute(ATTR_KEY_RTCPRSIZE.to_owned());

    let codecs = t.get_codecs().await;
    for codec in &codecs {
        let name = codec
            .capability
            .mime_type
            .trim_start_matches("audio/")
            .trim_start_matches("video/");
        media = media.with_codec(
            codec.payload_type,
            name.to_owned(),
            codec.capability.clock_rate,
            codec.capability.channels,
            codec.capability.sdp_fmtp_line.clone(),
        );

        for feedback in &codec.capability.rtcp_feedback {
            media = media.with_value_attribute(
                "rtcp-fb".to_owned(),
                format!("{} {} {}", codec.payload_type, feedback.typ, feedback.parameter),
            );
        }
    }
    if codecs.is_empty() {
        // Explicitly reject the track if we don't have the codec for it.
        let media = MediaDescription {
            media_name: MediaName {
                media: t.kind().to_string(),
                port: RangedPort {
                    value: 0,
                    range: None,
                },
                protos: vec![
                    "UDP".to_owned(),
                    "TLS".to_owned(),
                    "RTP".to_owned(),
                    "SAVPF".to_owned(),
                ],
                formats: vec!["0".to_owned()],
            },
            connection_information: Some(sdp::description::common::ConnectionInformation {
                network_type: "IN".to_owned(),
                address_type: "IP4".to_owned(),
                address: Some(sdp::description::common::Address {
                    address: "0.0.0.0".to_owned(),
                    ttl: None,
                    range: None,
                }),
            }),
            ..Default::default()
        };
        return Ok((d.with_media(media), false));
    }

    let mut directions = vec![];
    if t.sender().await.is_some() {
        directions.push(RTCRtpTransceiverDirection::Sendonly);
    }
    if t.receiver().await.is_some() {
        directions.push(RTCRtpTransceiverDirection::Recvonly);
    }

    let parameters = media_engine
        .get_rtp_parameters_by_kind(t.kind(), &directions)
        .await;
    for rtp_extension in &parameters.header_extensions {
        let ext_url = Url::parse(&rtp_extension.uri)
            .map_err(|e| Error::new(e.to_string()))?;
        media = media.with_extmap(ExtMap {
            value: rtp_extension.id,
            uri: Some(ext_url),
            ..Default::default()
        });
    }

    if !media_section.rid_map.is_empty() {
        let mut recv_rids = Vec::with_capacity(media_section.rid_map.len());
        for rid in media_section.rid_map.keys() {
            media = media.with_value_attribute(SDP_ATTRIBUTE_RID.to_owned(), format!("{rid} recv"));
            recv_rids.push(rid.clone());
        }
        media = media.with_value_attribute("simulcast".to_owned(), format!("recv {}", recv_rids.join(";")));
    }

    for mt in transceivers {
        if let Some(sender) = mt.sender().await {
            if let Some(track) = sender.track().await {
                media = media.with_media_source(
                    sender.ssrc(),
                    track.stream_id().to_owned(),
                    track.stream_id().to_owned(),
                    track.id().to_owned(),
                );
                if !is_plan_b {
                    media = media.with_property_attribute(format!(
                        "msid:{} {}",
                        track.stream_id(),
                        track.id()
                    ));
                    break;
                }
            }
        }
    }

    media = media.with_property_attribute(t.direction().to_string());

    for fingerprint in dtls_fingerprints {
        media = media.with_fingerprint(fingerprint.algorithm.clone(), fingerprint.value.to_uppercase());
    }

    if should_add_candidates {
        add_candidates_to_media_description(candidates, &mut media, ice_gathering_state).await?;
    }

    Ok((d.with_media(media), true))
}

/// populate_sdp serializes the PeerConnection's current state into an SDP,
/// one media section per entry of `media_sections`.
pub(crate) async fn populate_sdp(
    mut d: SessionDescription,
    dtls_fingerprints: &[RTCDtlsFingerprint],
    media_engine: &MediaEngine,
    candidates: &[RTCIceCandidate],
    ice_params: &RTCIceParameters,
    media_sections: &[MediaSection],
    params: PopulateSdpParams,
) -> Result<SessionDescription> {
    let media_dtls_fingerprints: &[RTCDtlsFingerprint] = if params.media_description_fingerprint {
        dtls_fingerprints
    } else {
        &[]
    };

    let mut bundle_value = "BUNDLE".to_owned();

    for (i, m) in media_sections.iter().enumerate() {
        if m.data && !m.transceivers.is_empty() {
            return Err(Error::ErrSDPMediaSectionMediaDataChanInvalid);
        } else if !params.is_plan_b && m.transceivers.len() > 1 {
            return Err(Error::ErrSDPMediaSectionMultipleTrackInvalid);
        }

        let should_add_candidates = i == 0;
        let should_add_id = if m.data {
            d = add_data_media_section(
                d,
                should_add_candidates,
                media_dtls_fingerprints,
                &m.id,
                ice_params,
                candidates,
                params.connection_role,
                params.ice_gathering_state,
            )
            .await?;
            true
        } else {
            let (new_d, should_add_id) = add_transceiver_sdp(
                d,
                params.is_plan_b,
                should_add_candidates,
                media_dtls_fingerprints,
                media_engine,
                &m.id,
                ice_params,
                candidates,
                params.connection_role,
                params.ice_gathering_state,
                m,
            )
            .await?;
            d = new_d;
            should_add_id
        };

        if should_add_id {
            bundle_value += " ";
            bundle_value += &m.id;
        }
    }

    if !params.media_description_fingerprint {
        for f in dtls_fingerprints {
            d = d.with_fingerprint(f.algorithm.clone(), f.value.to_uppercase());
        }
    }

    if params.is_icelite {
        // RFC 5245 S15.3
        d = d.with_value_attribute(ATTR_KEY_ICELITE.to_owned(), ATTR_KEY_ICELITE.to_owned());
    }

    Ok(d.with_value_attribute(ATTR_KEY_GROUP.to_owned(), bundle_value))
}

pub(crate) fn codecs_from_media_description(
    m: &MediaDescription,
) -> Result<Vec<RTCRtpCodecParameters>> {
    let s = SessionDescription {
        media_descriptions: vec![m.clone()],
        ..Default::default()
    };

    let mut out = vec![];
    for payload_str in &m.media_name.formats {
        let payload_type: u8 = payload_str
            .parse()
            .map_err(|_| Error::new(format!("invalid payload type {payload_str}")))?;

        let codec = match s.get_codec_for_payload_type(payload_type) {
            Ok(codec) => codec,
            Err(_) if payload_type == 0 => continue,
            Err(err) => return Err(err.into()),
        };

        let channels = codec.encoding_parameters.parse::<u16>().unwrap_or(0);

        let mut feedback = vec![];
        for raw in &codec.rtcp_feedback {
            let split: Vec<&str> = raw.split(' ').collect();
            feedback.push(RTCPFeedback {
                typ: split[0].to_owned(),
                parameter: split.get(1).map(|p| p.to_string()).unwrap_or_default(),
            });
        }

        out.push(RTCRtpCodecParameters {
            capability: RTCRtpCodecCapability {
                mime_type: format!("{}/{}", m.media_name.media, codec.name),
                clock_rate: codec.clock_rate,
                channels,
                sdp_fmtp_line: codec.fmtp.clone(),
                rtcp_feedback: feedback,
            },
            payload_type,
            ..Default::default()
        });
    }

    Ok(out)
}

pub(crate) fn rtp_extensions_from_media_description(
    m: &MediaDescription,
) -> Result<HashMap<String, isize>> {
    let mut out = HashMap::new();

    for a in &m.attributes {
        if a.key == ATTR_KEY_EXT_MAP {
            let value = a.to_string();
            let mut reader = std::io::Cursor::new(value.as_bytes());
            let e = ExtMap::unmarshal(&mut reader)?;
            if let Some(uri) = e.uri {
                out.insert(uri.to_string(), e.value);
            }
        }
    }

    Ok(out)
}
