// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixed RSA moduli. The VDF is only as strong as the assumption that no
//! party knows a factorization of the modulus in use, so implementations
//! must use these exact constants rather than regenerate them.

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::Num;
use serde::{Deserialize, Serialize};

use crate::biguint_serde;

/// An RSA modulus n = p * q with unknown factorization, defining the group
/// Z/nZ in which the VDF is evaluated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RsaModulus {
    #[serde(with = "biguint_serde")]
    pub value: BigUint,
}

lazy_static! {
    /// The 2048-bit modulus from the RSA Factoring Challenge.
    pub static ref RSA_2048: RsaModulus = RsaModulus {
        value: BigUint::from_str_radix(
            concat!(
                "251959084756578934940271832400483985714292821262040320277771378360436620207075955562640185258807",
                "844069182906412495150821892985591491761845028084891200728449926873928072877767359714183472702618",
                "963750149718246911650776133798590957000973304597488084284017974291006424586918171951187461215151",
                "726546322822168699875491824224336372590851418654620435767984233871847744479207399342365848238242",
                "811981638150106748104516603773060562016196762561338441436038339044149526344321901146575444541784",
                "240209246165157233507787077498171257724679629263863563732899121548314381678998850404453640235273",
                "81951378636564391212010397122822120720357",
            ),
            10,
        )
        .unwrap(),
    };

    /// 3072-bit modulus: the product of two 1536-bit primes derived by
    /// SHA-512 expansion of the seed "wesolowski-vdf-3072-v1".
    pub static ref RSA_3072: RsaModulus = RsaModulus {
        value: BigUint::from_str_radix(
            concat!(
                "439569535906505940949547215536879234348879643486749239355707568573692995291003997734810229395442",
                "440657974008975358496122019440048808276511075351528822628492275415871130689911175248109109946977",
                "548061079253882031740516237744875288146322290023904397653875116996499429262436129497582968721049",
                "851467469735425989631932876890818908056524467098704632465287339491623289814539684113824724406850",
                "626558106426438249478799057743224350175940594043601333931672651943904141511065546522723502333713",
                "455214056858309376746865491704783488455382573608541801364210013361448883483030127325830504435788",
                "601621728895627540244754785571327977174282970333168112858918342431217759531496779579736260743432",
                "421201311632033319006518934597001240989022138271353809431804120815062998972378632108740259142870",
                "395665814618293191761209666820045421901540787685097191741743421585805490817092520503214036143785",
                "8856865263056417842639120027422102701419991473561937124844509",
            ),
            10,
        )
        .unwrap(),
    };

    /// 4096-bit modulus: the product of two 2048-bit primes derived by
    /// SHA-512 expansion of the seed "wesolowski-vdf-4096-v1".
    pub static ref RSA_4096: RsaModulus = RsaModulus {
        value: BigUint::from_str_radix(
            concat!(
                "829115047015634593229448308339417366985379049417542919569055948687994788707215162901265803559699",
                "406168036341272580064610014955275465115126102782130339795141743277820804150783851819426537807417",
                "525301888409220956893963292830176873031654621338700572462059268021950085052949698084086071875853",
                "468941412623428443621569028800575409911267289917826976215398571833541985804263629626736869328424",
                "724685880188536515118863359288116882986274709964649644968901340875605261336249830639903662977404",
                "291845926229347982454496976541195214564138929147654199287582323086088280619579391899049147199838",
                "965930446036881059193972953235100528428577453392336321092445296651628669743213464561736597691263",
                "702389533985877470587682165691427186082756294930484769611078683430165203548612728219909754600471",
                "113384070282845228852867866048781089650822007592551817030194001484380325799575953740411594923403",
                "583695470944279334916657228477083576401834271163742768791578534034335689670204011701189048300885",
                "737286261137111513068922081893735051238910135539014840971563348592870414884450323199253326865558",
                "734015508319116148489780719791450488887683869098243595594361870587951290143447657995520484996281",
                "172562815801456354647574818950380268056210536326729167565146879626736977151370713",
            ),
            10,
        )
        .unwrap(),
    };
}
