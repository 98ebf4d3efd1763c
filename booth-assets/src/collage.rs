// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Server-side compositing of four captures into one 2×2 collage.

use booth_base::identifiers::PresetName;
use futures::future;

use crate::store::{AssetStore, AssetStoreError, Overlay, UploadOptions};

/// The number of captures a collage is made of.
pub const COLLAGE_INPUTS: usize = 4;

/// Side length of one collage tile.
pub const TILE_SIDE: u32 = 360;

/// Offsets of the three overlaid tiles against the base tile, in render
/// coordinates, forming the 2×2 grid.
pub const OVERLAY_OFFSETS: [(i32, i32); 3] = [(360, 0), (-180, 360), (180, 180)];

/// Uploads the four captures and returns the rendered composite bytes.
///
/// Rejects any input count other than four before making a remote call. The
/// whole unit — four tile uploads plus fetching the render — either succeeds
/// or surfaces one error; callers that retry must re-run it from scratch, so
/// that tiles are never re-uploaded under identifiers the composite no
/// longer references.
pub async fn compose<S>(
    store: &S,
    images: &[Vec<u8>],
    preset: Option<&PresetName>,
) -> Result<Vec<u8>, AssetStoreError>
where
    S: AssetStore,
{
    if images.len() != COLLAGE_INPUTS {
        return Err(AssetStoreError::InvalidImageCount {
            expected: COLLAGE_INPUTS,
            got: images.len(),
        });
    }

    let tiles = future::try_join_all(
        images
            .iter()
            .map(|image| store.upload(image, UploadOptions::square(TILE_SIDE))),
    )
    .await?;

    let overlays = tiles[1..]
        .iter()
        .zip(OVERLAY_OFFSETS)
        .map(|(tile, (x, y))| Overlay {
            id: tile.id.clone(),
            x,
            y,
            width: TILE_SIDE,
            height: TILE_SIDE,
        })
        .collect::<Vec<_>>();

    let url = store.composite_url(&tiles[0].id, &overlays, preset);
    store.fetch(&url).await
}

#[cfg(test)]
#[path = "unit_tests/collage_tests.rs"]
mod collage_tests;
